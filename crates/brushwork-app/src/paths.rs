//! Filesystem helpers for the generated-image output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Deterministic layout for batch output: one flat directory holding
/// `{base_name}_{index}.png` files.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    base_dir: PathBuf,
}

impl OutputPaths {
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base_dir: base.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the output directory if absent. Idempotent.
    pub fn ensure(&self) -> Result<(), PathError> {
        ensure_dir(&self.base_dir)
    }

    /// Destination for job `index` of batch `base_name`.
    pub fn artifact_file(&self, base_name: &str, index: u32) -> PathBuf {
        debug_assert!(!base_name.trim().is_empty());
        self.base_dir.join(format!("{base_name}_{index}.png"))
    }
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if let Err(err) = fs::create_dir_all(path) {
        if err.kind() != io::ErrorKind::AlreadyExists {
            return Err(PathError::CreateDir {
                path: path.to_path_buf(),
                source: err,
            });
        }
    }
    Ok(())
}
