//! Artifact persistence with atomic finalize.
//!
//! Bytes land in a temp file inside the destination directory and are
//! persisted by rename, so a reader never observes a partially-written
//! image. A failed job leaves nothing at the destination.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::paths::OutputPaths;
use crate::services::context::{GenerateError, GenerateResult};

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create the output directory if absent. Idempotent; called once per
    /// batch before any job starts.
    async fn prepare(&self) -> GenerateResult<()>;

    /// Deterministic destination for `(base_name, index)`.
    fn artifact_path(&self, base_name: &str, index: u32) -> PathBuf;

    /// Persist `bytes` at `path`, returning the path written.
    async fn put(&self, path: &Path, bytes: Vec<u8>) -> GenerateResult<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    paths: OutputPaths,
}

impl FsArtifactStore {
    pub fn new(paths: OutputPaths) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn prepare(&self) -> GenerateResult<()> {
        let paths = self.paths.clone();
        tokio::task::spawn_blocking(move || paths.ensure()).await??;
        Ok(())
    }

    fn artifact_path(&self, base_name: &str, index: u32) -> PathBuf {
        self.paths.artifact_file(base_name, index)
    }

    async fn put(&self, path: &Path, bytes: Vec<u8>) -> GenerateResult<PathBuf> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            write_atomic(&path, &bytes)?;
            Ok(path)
        })
        .await?
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> GenerateResult<()> {
    let dir = path.parent().ok_or_else(|| GenerateError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other("artifact path has no parent directory"),
    })?;

    let io_err = |source: std::io::Error| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Temp file in the destination directory so the final rename stays on
    // one filesystem.
    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(bytes).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}
