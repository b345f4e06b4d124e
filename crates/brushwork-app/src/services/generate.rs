//! Single-job execution: one generation call with bounded, jittered retry.

use std::path::Path;

use backon::Retryable;
use tracing::warn;

use crate::services::context::{
    GenContext, GenerationRequest, ImagePayload, JobResult, SavedArtifact,
};

/// Run one job to a terminal outcome. Every attempt covers the full call
/// chain (service call, optional remote fetch, artifact write); any error
/// inside it counts as a failed attempt and consumes retry budget. Errors
/// never propagate past this function.
pub async fn execute_job(
    ctx: &GenContext,
    request: &GenerationRequest,
    index: u32,
    dest: &Path,
    max_retries: usize,
) -> JobResult {
    let backoff = ctx.backoff.clone().with_max_times(max_retries);

    let attempt = || async {
        if let Some(limiter) = &ctx.limiter {
            limiter.until_ready().await;
        }
        let payload = ctx.client.generate(request).await?;
        let bytes = match payload {
            ImagePayload::Inline(bytes) => bytes,
            ImagePayload::Remote(url) => ctx.client.fetch_remote(&url).await?,
        };
        ctx.store.put(dest, bytes).await
    };

    match attempt
        .retry(backoff)
        .notify(|err, delay| {
            warn!(index, ?delay, error = %err, "generation attempt failed; retrying");
        })
        .await
    {
        Ok(path) => JobResult::Success(SavedArtifact { index, path }),
        Err(err) => JobResult::Failure(err),
    }
}
