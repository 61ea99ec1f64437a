// src/lib.rs
//! prompt2post library — generates social posts with a language model,
//! checks them against platform rules and publishes them.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Pipeline** — `PublishOrchestrator`, `Drafter`, `TextPublisher`, `PipelineSettings`
//! - **Presentation boundary** — `PostPipeline`, `Advisor`
//! - **Generation** — `TextGenerator`, `ChatCompletionsClient`, `ContentGenerator`
//! - **Validation** — `PostValidator`, `ValidationRules`, `AcceptedEncoding`
//! - **Publishing** — `PlatformApi`, `PlatformHttpClient`, `Publisher`
//! - **Errors** — `AppError`, `GenerationError`, `ValidationError`, `PublisherError`

pub mod assistant;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod generation;
pub mod http;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod publisher;
pub mod tone;
pub mod types;
pub mod validator;

// --- Error Handling ---
pub use crate::error::{
    AppError, GenerationCause, GenerationError, InvalidToneError, PublisherError,
    PublisherErrorKind,
};
pub use crate::validator::{ValidationError, Violation, ViolationKind};

// --- Configuration ---
pub use crate::config::{CommandLineInput, GeneratorConfig, PlatformConfig};
pub use crate::error_recovery::RetryPolicy;

// --- Domain Model ---
pub use crate::model::{
    DraftPost, FailureStage, GenerationRequest, PostOptions, Profile, PublishResult,
    PublishStatus, ValidatedPost,
};

// --- Domain Types ---
pub use crate::types::{
    AccessToken, ApiKey, ModelName, PostLength, RemotePostId, Tone, Topic, ValidatedUrl,
};

// --- Stages ---
pub use crate::assistant::{ChatAssistant, ChatSession};
pub use crate::generation::{
    ChatCompletionsClient, ChatMessage, Completion, CompletionRequest, ContentGenerator, Role,
    TextGenerator,
};
pub use crate::orchestrator::{
    Drafter, PipelineFailure, PipelineSettings, PublishOrchestrator, RepairPolicy, TextPublisher,
};
pub use crate::publisher::{PlatformApi, PlatformHttpClient, Publisher};
pub use crate::tone::{resolve, resolve_selector, ToneTemplate};
pub use crate::validator::{AcceptedEncoding, PostValidator, ValidationRules};

// --- Pipeline Traits ---
pub use crate::pipeline::{Advisor, PostPipeline};
