use std::{fmt, num::NonZeroU32, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use backon::ExponentialBuilder;
use bon::Builder;
use governor::clock::DefaultClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use governor::{Quota, RateLimiter};
use thiserror::Error;

use openai_ox::OpenAiRequestError;

use crate::config::AppConfig;
use crate::paths::{OutputPaths, PathError};
use crate::services::artifact::{ArtifactStore, FsArtifactStore};
use crate::services::client::OpenAiImageClient;

pub type GenericRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Which HTTP surface a model is driven through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// `/images/generations`; prompt only.
    Images,
    /// `/responses` with the `image_generation` tool; accepts reference images.
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageModel {
    #[default]
    GptImage1,
    DallE3,
    DallE2,
    Gpt4o,
    Gpt41,
    Gpt5,
}

impl ImageModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GptImage1 => "gpt-image-1",
            Self::DallE3 => "dall-e-3",
            Self::DallE2 => "dall-e-2",
            Self::Gpt4o => "gpt-4o",
            Self::Gpt41 => "gpt-4.1",
            Self::Gpt5 => "gpt-5",
        }
    }

    pub fn api_family(self) -> ApiFamily {
        match self {
            Self::GptImage1 | Self::DallE3 | Self::DallE2 => ApiFamily::Images,
            Self::Gpt4o | Self::Gpt41 | Self::Gpt5 => ApiFamily::Responses,
        }
    }

    /// `gpt-image-1` is the only Image API model that accepts the
    /// `quality`/`background` extras; sending them to `dall-e` fails the call.
    pub fn supports_quality_background(self) -> bool {
        matches!(self, Self::GptImage1)
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    Transparent,
    Opaque,
    #[default]
    Auto,
}

impl Background {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transparent => "transparent",
            Self::Opaque => "opaque",
            Self::Auto => "auto",
        }
    }
}

/// How closely reference input images are preserved in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fidelity {
    #[default]
    Low,
    High,
}

impl Fidelity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Auto,
    #[default]
    Square1024,
    Portrait1024x1536,
    Landscape1536x1024,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Square1024 => "1024x1024",
            Self::Portrait1024x1536 => "1024x1536",
            Self::Landscape1536x1024 => "1536x1024",
        }
    }
}

/// Reference image embedded by value into outgoing requests.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub bytes: Arc<[u8]>,
    pub mime_type: &'static str,
}

impl ReferenceImage {
    pub fn new(bytes: Vec<u8>, mime_type: &'static str) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type,
        }
    }
}

/// Request-level knobs shared by every job of a batch. Capability
/// differences between models are resolved once here, at construction time,
/// not per call.
#[derive(Debug, Clone, Builder)]
pub struct GenerationProfile {
    #[builder(default)]
    pub model: ImageModel,
    #[builder(default)]
    pub size: ImageSize,
    #[builder(default)]
    pub quality: Quality,
    #[builder(default)]
    pub background: Background,
    #[builder(default)]
    pub input_fidelity: Fidelity,
    #[builder(default)]
    pub reference_images: Vec<ReferenceImage>,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GenerationProfile {
    pub fn request_for(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.into(),
            profile: self.clone(),
        }
    }
}

/// One logical generation request. Immutable once a batch starts; jobs
/// share it read-only.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub profile: GenerationProfile,
}

/// Payload shapes the service may answer with.
#[derive(Debug, Clone)]
pub enum ImagePayload {
    /// Raw image bytes (base64 already decoded).
    Inline(Vec<u8>),
    /// Remote locator to fetch.
    Remote(String),
}

/// Artifact written for one successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub index: u32,
    pub path: PathBuf,
}

/// Terminal outcome of one job. Exactly one per job; errors never escape
/// past this boundary.
#[derive(Debug)]
pub enum JobResult {
    Success(SavedArtifact),
    Failure(GenerateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Perform one generation call. Every failure mode is an `Err`; retry
    /// policy belongs to the caller.
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<ImagePayload>;

    /// Fetch the bytes behind a remote locator.
    async fn fetch_remote(&self, url: &str) -> GenerateResult<Vec<u8>>;
}

/// Advisory progress events. Implementations must not affect correctness;
/// the engine works identically under [`NullProgress`].
pub trait ProgressObserver: Send + Sync {
    fn batch_started(&self, _base_name: &str, _total: u32) {}

    fn job_finished(&self, index: u32, total: u32, outcome: JobOutcome);

    fn batch_finished(&self, _base_name: &str, _succeeded: u32, _total: u32) {}
}

pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn job_finished(&self, _index: u32, _total: u32, _outcome: JobOutcome) {}
}

pub type GenerateResult<T> = Result<T, GenerateError>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Api(#[from] Box<OpenAiRequestError>),
    #[error("service returned neither inline image data nor a remote locator")]
    MissingPayload,
    #[error("image payload is not valid base64: {0}")]
    PayloadDecode(#[from] base64::DecodeError),
    #[error("failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("reference images require a Responses API model, got {0}")]
    ReferencesNotSupported(ImageModel),
    #[error("duplicate batch name `{0}`")]
    DuplicateBatchName(String),
    #[error("artifact write task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<OpenAiRequestError> for GenerateError {
    fn from(err: OpenAiRequestError) -> Self {
        GenerateError::Api(Box::new(err))
    }
}

/// Shared collaborators for one run. Cheap to clone; every field is either
/// `Copy`-like or behind an `Arc`.
#[derive(Clone)]
pub struct GenContext {
    pub client: Arc<dyn ImageClient>,
    pub store: Arc<dyn ArtifactStore>,
    pub backoff: ExponentialBuilder,
    pub limiter: Option<Arc<GenericRateLimiter>>,
    pub progress: Arc<dyn ProgressObserver>,
}

pub fn build_gen_context(config: &AppConfig, progress: Arc<dyn ProgressObserver>) -> GenContext {
    let paths = OutputPaths::new(&config.output_dir);
    let store = FsArtifactStore::new(paths);
    let client = OpenAiImageClient::new(config);

    let quota = Quota::per_second(NonZeroU32::new(4).expect("quota must be non-zero"));
    let backoff = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(200))
        .with_max_delay(Duration::from_secs(5))
        .with_jitter();

    GenContext {
        client: Arc::new(client),
        store: Arc::new(store),
        backoff,
        limiter: Some(Arc::new(RateLimiter::direct(quota))),
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gpt_image_1_takes_quality_and_background() {
        assert!(ImageModel::GptImage1.supports_quality_background());
        assert!(!ImageModel::DallE3.supports_quality_background());
        assert!(!ImageModel::Gpt5.supports_quality_background());
    }

    #[test]
    fn reference_capable_models_use_the_responses_family() {
        assert_eq!(ImageModel::GptImage1.api_family(), ApiFamily::Images);
        assert_eq!(ImageModel::DallE2.api_family(), ApiFamily::Images);
        assert_eq!(ImageModel::Gpt4o.api_family(), ApiFamily::Responses);
        assert_eq!(ImageModel::Gpt5.api_family(), ApiFamily::Responses);
    }

    #[test]
    fn profile_defaults_match_the_image_api_defaults() {
        let profile = GenerationProfile::default();
        assert_eq!(profile.model, ImageModel::GptImage1);
        assert_eq!(profile.size.as_str(), "1024x1024");
        assert_eq!(profile.quality, Quality::Auto);
        assert_eq!(profile.background, Background::Auto);
        assert_eq!(profile.input_fidelity, Fidelity::Low);
        assert!(profile.reference_images.is_empty());
    }

    #[test]
    fn request_for_clones_the_profile_per_request() {
        let profile = GenerationProfile::builder()
            .model(ImageModel::Gpt5)
            .quality(Quality::High)
            .build();
        let request = profile.request_for("a lighthouse at dusk");
        assert_eq!(request.prompt, "a lighthouse at dusk");
        assert_eq!(request.profile.model, ImageModel::Gpt5);
        assert_eq!(request.profile.quality, Quality::High);
    }
}
