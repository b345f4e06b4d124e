//! Startup configuration: credential and output-directory resolution.
//!
//! Everything ambient is read exactly once here; the rest of the crate
//! receives an [`AppConfig`] by reference and never consults the process
//! environment itself.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "generated_imgs_gpt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "OPENAI_API_KEY not found in environment or .env file; add OPENAI_API_KEY=your-key-here to your .env file"
    )]
    MissingApiKey,
}

/// API credential with a redacted `Debug` representation.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: ApiKey,
    /// Override for the API base URL; `None` means the production endpoint.
    pub base_url: Option<String>,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the environment, honoring an adjacent `.env`
    /// file. A missing credential is fatal; everything else has defaults.
    pub fn load() -> Result<Self, ConfigError> {
        // Absence of a .env file is fine; the variable may be set directly.
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(ApiKey::new)
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = std::env::var("BRUSHWORK_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let output_dir = std::env::var("BRUSHWORK_OUTPUT_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            api_key,
            base_url,
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret-value");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.expose(), "sk-secret-value");
    }
}
