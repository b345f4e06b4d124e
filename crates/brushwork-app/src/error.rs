use thiserror::Error;

use crate::config::ConfigError;
use crate::paths::PathError;
use crate::services::GenerateError;

/// Top-level error surfaced to the CLI. Only setup failures land here; job
/// failures are absorbed inside the batch layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl AppError {
    pub fn message(msg: impl Into<String>) -> Self {
        AppError::Message(msg.into())
    }
}
