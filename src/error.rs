// src/error.rs
//! Application error types with structured error handling.
//!
//! Each pipeline stage owns a typed failure vocabulary. The orchestrator
//! matches on these types to decide between retrying, rejecting and failing,
//! so classification never depends on matching error strings.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A tone selector outside the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tone '{0}' (expected one of: professional, casual, inspirational, educational)")]
pub struct InvalidToneError(pub String);

/// Why a call to the text-generation service did not produce a draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationCause {
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("provider rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider rejected the API key")]
    Unauthorized,

    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider returned empty text")]
    EmptyResponse,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("prompt template failed to render: {0}")]
    Template(String),
}

/// Failure of the content generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Generation failed: {cause}")]
pub struct GenerationError {
    pub cause: GenerationCause,
}

impl GenerationError {
    pub fn new(cause: GenerationCause) -> Self {
        Self { cause }
    }

    /// Whether repeating the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        match &self.cause {
            GenerationCause::Timeout(_)
            | GenerationCause::RateLimited { .. }
            | GenerationCause::Transport(_) => true,
            GenerationCause::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-provided delay hint, if the provider sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.cause {
            GenerationCause::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<GenerationCause> for GenerationError {
    fn from(cause: GenerationCause) -> Self {
        Self::new(cause)
    }
}

/// Classification of a platform API failure.
///
/// The kind alone decides the retry behaviour: `Transient` and
/// `RateLimited` may be retried, everything else is surfaced immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublisherErrorKind {
    /// Token missing, expired or lacking permission (401/403)
    Unauthorized,
    /// Platform throttled the client (429)
    RateLimited,
    /// Network blip or 5xx; expected to resolve on retry
    Transient,
    /// Any other 4xx; the request will never succeed as sent
    PermanentRejected,
    /// The outcome cannot be determined, e.g. a timeout after the request was sent
    Unknown,
}

impl PublisherErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::RateLimited)
    }
}

impl fmt::Display for PublisherErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Transient => write!(f, "transient"),
            Self::PermanentRejected => write!(f, "permanent_rejected"),
            Self::Unknown => write!(f, "unknown_outcome"),
        }
    }
}

/// Failure of a platform API operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Platform API error ({kind}): {message}")]
pub struct PublisherError {
    pub kind: PublisherErrorKind,
    /// HTTP status, when the platform answered at all
    pub status: Option<u16>,
    /// Retry-After hint sent with a 429
    pub retry_after: Option<Duration>,
    pub message: String,
}

impl PublisherError {
    pub fn new(kind: PublisherErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// True when the platform may or may not have applied the request.
    pub fn is_ambiguous(&self) -> bool {
        self.kind == PublisherErrorKind::Unknown
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error interacting with clipboard: {0}")]
    Clipboard(String),

    #[error("Template error for template {name}: {message}")]
    TemplateError { name: String, message: String },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error(transparent)]
    Field(#[from] crate::types::FieldError),

    #[error(transparent)]
    InvalidTone(#[from] InvalidToneError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Validation(#[from] crate::validator::ValidationError),

    #[error(transparent)]
    Publisher(#[from] PublisherError),
}

impl From<arboard::Error> for AppError {
    fn from(err: arboard::Error) -> Self {
        AppError::Clipboard(format!("Clipboard error: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
