//! Fan-out of one generation request into an ordered batch of jobs.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use bon::Builder;
use futures_concurrency::concurrent_stream::IntoConcurrentStream;
use futures_concurrency::prelude::ConcurrentStream;
use tracing::{debug, warn};

use crate::services::context::{
    GenContext, GenerateResult, GenerationRequest, JobOutcome, JobResult, SavedArtifact,
};
use crate::services::generate::execute_job;

#[derive(Debug, Clone, Builder)]
pub struct BatchConfig {
    /// Number of independent jobs to fan the request out into.
    #[builder(default = 5)]
    pub count: u32,
    /// Worker-pool bound: jobs in flight at once.
    #[builder(default = NonZeroUsize::new(5).expect("default parallelism is non-zero"))]
    pub max_parallel: NonZeroUsize,
    /// Additional attempts after a failed call (total attempts = 1 + this).
    #[builder(default = 2)]
    pub max_retries: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Run `cfg.count` jobs sharing `request` under a pool of at most
/// `cfg.max_parallel` workers and return the successful artifacts ordered
/// by ascending job index.
///
/// Completion order is arbitrary; only the index determines output
/// position. Failed jobs are omitted from the result (no placeholders), and
/// a batch with zero successes is an empty `Ok`. The pool is fully drained
/// before this returns. The only error surfaced here is output-directory
/// creation failure.
pub async fn run_batch(
    ctx: &GenContext,
    request: &GenerationRequest,
    base_name: &str,
    cfg: &BatchConfig,
) -> GenerateResult<Vec<SavedArtifact>> {
    ctx.store.prepare().await?;

    let total = cfg.count;
    if total == 0 {
        return Ok(Vec::new());
    }

    ctx.progress.batch_started(base_name, total);

    let ctx = Arc::new(ctx.clone());
    let request = Arc::new(request.clone());
    let batch_name = base_name.to_string();
    let base_name = Arc::new(batch_name.clone());
    let collected: Arc<Mutex<Vec<(u32, SavedArtifact)>>> =
        Arc::new(Mutex::new(Vec::with_capacity(total as usize)));
    let max_retries = cfg.max_retries;

    let ctx_for_jobs = Arc::clone(&ctx);
    let collected_for_jobs = Arc::clone(&collected);

    (1..=total)
        .collect::<Vec<u32>>()
        .into_co_stream()
        .limit(Some(cfg.max_parallel))
        .for_each(move |index| {
            let ctx = Arc::clone(&ctx_for_jobs);
            let request = Arc::clone(&request);
            let base_name = Arc::clone(&base_name);
            let collected = Arc::clone(&collected_for_jobs);
            async move {
                let dest = ctx.store.artifact_path(&base_name, index);
                match execute_job(&ctx, &request, index, &dest, max_retries).await {
                    JobResult::Success(artifact) => {
                        debug!(index, path = %artifact.path.display(), "job completed");
                        collected
                            .lock()
                            .expect("batch result lock poisoned")
                            .push((index, artifact));
                        ctx.progress.job_finished(index, total, JobOutcome::Succeeded);
                    }
                    JobResult::Failure(err) => {
                        warn!(index, error = %err, "job failed after all attempts");
                        ctx.progress.job_finished(index, total, JobOutcome::Failed);
                    }
                }
            }
        })
        .await;

    let mut guard = collected.lock().expect("batch result lock poisoned");
    let mut ordered = std::mem::take(&mut *guard);
    drop(guard);

    ordered.sort_by_key(|(index, _)| *index);
    let artifacts: Vec<SavedArtifact> = ordered.into_iter().map(|(_, artifact)| artifact).collect();

    ctx.progress
        .batch_finished(&batch_name, artifacts.len() as u32, total);

    Ok(artifacts)
}
