//! Sequential execution of independently named batches.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::info;

use crate::services::batch::{BatchConfig, run_batch};
use crate::services::context::{
    GenContext, GenerateError, GenerateResult, GenerationProfile, SavedArtifact,
};

/// One named batch: the batch name doubles as the artifact base name.
#[derive(Debug, Clone)]
pub struct NamedPrompt {
    pub name: String,
    pub prompt: String,
}

impl NamedPrompt {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }
}

/// Run one batch per named prompt, strictly in sequence: a batch's worker
/// pool is fully drained before the next batch starts. Batches with zero
/// successes still appear in the mapping (with an empty list) and do not
/// stop the remaining batches. The mapping preserves input order.
///
/// Duplicate names are rejected up front; silently letting a later batch
/// overwrite an earlier result under the same name would also overwrite its
/// files on disk.
pub async fn run_prompt_list(
    ctx: &GenContext,
    profile: &GenerationProfile,
    prompts: &[NamedPrompt],
    cfg: &BatchConfig,
) -> GenerateResult<IndexMap<String, Vec<SavedArtifact>>> {
    let mut seen = HashSet::with_capacity(prompts.len());
    for named in prompts {
        if !seen.insert(named.name.as_str()) {
            return Err(GenerateError::DuplicateBatchName(named.name.clone()));
        }
    }

    let mut results = IndexMap::with_capacity(prompts.len());
    for named in prompts {
        info!(name = %named.name, count = cfg.count, "running batch");
        let request = profile.request_for(named.prompt.clone());
        let artifacts = run_batch(ctx, &request, &named.name, cfg).await?;
        info!(name = %named.name, succeeded = artifacts.len(), total = cfg.count, "batch finished");
        results.insert(named.name.clone(), artifacts);
    }
    Ok(results)
}
