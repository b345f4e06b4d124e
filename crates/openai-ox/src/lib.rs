//! Minimal typed client for the OpenAI image endpoints.
//!
//! Covers the two request shapes the generation pipeline needs: the Image
//! API (`/images/generations`) and the Responses API (`/responses`) with the
//! `image_generation` tool. The client never touches the process
//! environment; callers own credential loading.

pub mod images;
pub mod responses;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use images::{ImageData, ImageGenerationRequest, ImagesResponse};
pub use responses::{InputContent, InputMessage, OutputItem, ResponsesRequest, ResponsesResult, Tool};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum OpenAiRequestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("OpenAI API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode OpenAI response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Handle for the OpenAI HTTP API. Cheap to clone.
#[derive(Clone)]
pub struct OpenAi {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAi")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, OpenAiRequestError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug_assert!(path.starts_with('/'));

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(OpenAiRequestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch a remote artifact locator returned by the Image API.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, OpenAiRequestError> {
        if url.trim().is_empty() {
            return Err(OpenAiRequestError::InvalidRequest(
                "download url must not be empty".to_string(),
            ));
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiRequestError::Api {
                status: status.as_u16(),
                message: format!("artifact download failed for {url}"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Error envelope the API wraps failures in: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trims_trailing_slash() {
        let client = OpenAi::new("test").with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn error_envelope_parses_api_shape() {
        let raw = r#"{"error":{"message":"Rate limit reached","type":"rate_limit_error","code":"rate_limit_exceeded"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(raw).expect("error envelope parses");
        assert_eq!(envelope.error.message, "Rate limit reached");
        assert_eq!(envelope.error.kind.as_deref(), Some("rate_limit_error"));
        assert_eq!(envelope.error.code.as_deref(), Some("rate_limit_exceeded"));
    }
}
