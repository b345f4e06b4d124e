//! Orchestration layer for the generation pipeline.
//!
//! Modules here coordinate external systems (the OpenAI endpoints, rate
//! limiting, artifact storage). Pure prompt material lives in
//! `crate::scenarios`; keep it out of this tree so concurrency and resource
//! accounting stay localized.

pub mod artifact;
pub mod batch;
pub mod client;
pub mod context;
pub mod generate;
pub mod runner;

pub use artifact::{ArtifactStore, FsArtifactStore};
pub use batch::{BatchConfig, run_batch};
pub use client::OpenAiImageClient;
pub use context::{
    ApiFamily, Background, Fidelity, GenContext, GenerateError, GenerateResult, GenerationProfile,
    GenerationRequest, GenericRateLimiter, ImageClient, ImageModel, ImagePayload, ImageSize,
    JobOutcome, JobResult, NullProgress, ProgressObserver, Quality, ReferenceImage, SavedArtifact,
    build_gen_context,
};
pub use runner::{NamedPrompt, run_prompt_list};
