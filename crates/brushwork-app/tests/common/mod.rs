#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use backon::ExponentialBuilder;
use rand::Rng;

use brushwork_app::paths::OutputPaths;
use brushwork_app::services::{
    ArtifactStore, FsArtifactStore, GenContext, GenerateError, GenerateResult, GenerationRequest,
    ImageClient, ImagePayload, NullProgress,
};

/// Client that always succeeds with deterministic bytes. With `jitter`
/// enabled every call sleeps a small random amount, so completion order is
/// deliberately scrambled relative to job index.
pub struct StaticClient {
    pub calls: AtomicUsize,
    pub jitter: bool,
}

impl StaticClient {
    pub fn new(jitter: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            jitter,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageClient for StaticClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<ImagePayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.jitter {
            let delay = {
                let mut rng = rand::thread_rng();
                Duration::from_millis(rng.gen_range(0..8))
            };
            tokio::time::sleep(delay).await;
        }
        Ok(ImagePayload::Inline(
            format!("image for: {}", request.prompt).into_bytes(),
        ))
    }

    async fn fetch_remote(&self, url: &str) -> GenerateResult<Vec<u8>> {
        Ok(format!("fetched:{url}").into_bytes())
    }
}

/// Filesystem store that refuses to persist artifacts whose file stem is in
/// the deny set, simulating jobs that fail every attempt.
pub struct FailingStore {
    inner: FsArtifactStore,
    deny: HashSet<String>,
}

impl FailingStore {
    pub fn new(paths: OutputPaths, deny: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner: FsArtifactStore::new(paths),
            deny: deny.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ArtifactStore for FailingStore {
    async fn prepare(&self) -> GenerateResult<()> {
        self.inner.prepare().await
    }

    fn artifact_path(&self, base_name: &str, index: u32) -> PathBuf {
        self.inner.artifact_path(base_name, index)
    }

    async fn put(&self, path: &Path, bytes: Vec<u8>) -> GenerateResult<PathBuf> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        if self.deny.contains(stem) {
            return Err(GenerateError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("injected write failure"),
            });
        }
        self.inner.put(path, bytes).await
    }
}

/// Context with near-zero backoff delays and no rate limiter, so retry
/// exhaustion finishes in milliseconds.
pub fn test_context(client: Arc<dyn ImageClient>, store: Arc<dyn ArtifactStore>) -> GenContext {
    GenContext {
        client,
        store,
        backoff: ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2)),
        limiter: None,
        progress: Arc::new(NullProgress),
    }
}
