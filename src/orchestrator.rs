// src/orchestrator.rs
//! Publish orchestrator — generator, validator and publisher composed into
//! one request.
//!
//! Every stage short-circuits. Stage failures travel as [`PipelineFailure`]
//! and are folded into a [`PublishResult`] at the end, so callers always get
//! a result with a reason rather than an error.

use crate::error::{GenerationCause, GenerationError, InvalidToneError, PublisherError, PublisherErrorKind};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::generation::ContentGenerator;
use crate::model::{DraftPost, FailureStage, GenerationRequest, PublishResult, ValidatedPost};
use crate::pipeline::PostPipeline;
use crate::publisher::Publisher;
use crate::types::{FieldError, Tone, Topic};
use crate::validator::{
    truncate_to_limit, PostValidator, ValidationError, Violation, ViolationKind,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// What to do with a draft that exceeds the character limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairPolicy {
    /// Cut at a word boundary, append an ellipsis and validate again
    Truncate,
    /// Reject the draft
    #[default]
    Abort,
}

impl fmt::Display for RepairPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairPolicy::Truncate => write!(f, "truncate"),
            RepairPolicy::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for RepairPolicy {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(RepairPolicy::Truncate),
            "abort" => Ok(RepairPolicy::Abort),
            _ => Err(FieldError::UnknownRepairPolicy(s.to_string())),
        }
    }
}

/// Orchestrator tunables.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Extra generation attempts after a retryable failure
    pub generation_retries: u32,
    pub repair: RepairPolicy,
    /// Delays between generation attempts; its attempt count is ignored
    pub generation_backoff: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            generation_retries: crate::constants::DEFAULT_GENERATION_RETRIES,
            repair: RepairPolicy::default(),
            generation_backoff: RetryPolicy::default(),
        }
    }
}

/// The stage that stopped a request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineFailure {
    #[error(transparent)]
    Generation(GenerationError),

    #[error("{error}")]
    Validation { error: ValidationError, text: String },

    #[error(transparent)]
    Publish(PublisherError),

    #[error("request cancelled")]
    Cancelled,

    #[error("request cancelled while the post was being created; it may exist on the platform")]
    CancelledInFlight,
}

impl From<PipelineFailure> for PublishResult {
    fn from(failure: PipelineFailure) -> Self {
        let reason = failure.to_string();
        match failure {
            PipelineFailure::Generation(_) => PublishResult::failed(FailureStage::Generation, reason),
            PipelineFailure::Validation { text, .. } => {
                let text = (!text.is_empty()).then_some(text);
                PublishResult::rejected(reason, text)
            }
            PipelineFailure::Publish(e) => PublishResult::failed(FailureStage::Publish(e.kind), reason),
            PipelineFailure::Cancelled => PublishResult::failed(FailureStage::Cancelled, reason),
            PipelineFailure::CancelledInFlight => {
                PublishResult::failed(FailureStage::Publish(PublisherErrorKind::Unknown), reason)
            }
        }
    }
}

/// Generates and validates drafts, repairing them when the policy allows.
///
/// Never talks to the platform, so it runs without platform credentials.
#[derive(Clone)]
pub struct Drafter {
    generator: ContentGenerator,
    validator: PostValidator,
    settings: PipelineSettings,
}

impl Drafter {
    pub fn new(
        generator: ContentGenerator,
        validator: PostValidator,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            generator,
            validator,
            settings,
        }
    }

    pub fn validator(&self) -> &PostValidator {
        &self.validator
    }

    /// Generates and validates a post without publishing it.
    pub async fn draft(&self, request: &GenerationRequest) -> Result<ValidatedPost, PipelineFailure> {
        let request_id = Uuid::new_v4();
        log::info!("[{}] Drafting {} post about '{}'", request_id, request.tone, request.topic);
        self.prepare(request_id, request).await
    }

    async fn prepare(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<ValidatedPost, PipelineFailure> {
        let draft = self.generate(request_id, request).await?;
        self.validate(request_id, draft)
    }

    async fn generate(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<DraftPost, PipelineFailure> {
        let policy = self
            .settings
            .generation_backoff
            .clone()
            .with_max_attempts(self.settings.generation_retries.saturating_add(1));
        let label = format!("[{}] generate", request_id);
        let generator = &self.generator;

        let draft = retry_with_backoff(&policy, &label, move |_| generator.generate(request))
            .await
            .map_err(|error| match error.cause {
                // An empty draft is a content problem, not a provider failure
                GenerationCause::EmptyResponse => PipelineFailure::Validation {
                    error: ValidationError {
                        violations: vec![Violation::Empty],
                    },
                    text: String::new(),
                },
                _ => PipelineFailure::Generation(error),
            })?;

        log::info!("[{}] Draft ready ({} chars)", request_id, draft.char_count());
        Ok(draft)
    }

    fn validate(&self, request_id: Uuid, draft: DraftPost) -> Result<ValidatedPost, PipelineFailure> {
        let error = match self.validator.validate(&draft) {
            Ok(post) => return Ok(post),
            Err(error) => error,
        };

        if self.settings.repair != RepairPolicy::Truncate || !error.contains(ViolationKind::TooLong) {
            log::warn!("[{}] Draft rejected: {}", request_id, error);
            return Err(PipelineFailure::Validation {
                error,
                text: draft.text,
            });
        }

        let max_chars = self.validator.rules().max_chars;
        let repaired = DraftPost {
            text: truncate_to_limit(&draft.text, max_chars),
            ..draft
        };
        log::info!(
            "[{}] Truncated draft from {} to {} chars",
            request_id,
            draft_len(&error),
            repaired.char_count()
        );

        self.validator.validate(&repaired).map_err(|error| {
            log::warn!("[{}] Repaired draft still rejected: {}", request_id, error);
            PipelineFailure::Validation {
                error,
                text: repaired.text.clone(),
            }
        })
    }
}

/// Validates finished text and submits it to the platform.
#[derive(Clone)]
pub struct TextPublisher {
    validator: PostValidator,
    publisher: Publisher,
}

impl TextPublisher {
    pub fn new(validator: PostValidator, publisher: Publisher) -> Self {
        Self {
            validator,
            publisher,
        }
    }

    /// Validates and publishes text supplied by the user.
    ///
    /// User text is never altered, so no repair policy applies.
    pub async fn publish_text(&self, text: &str) -> PublishResult {
        let request_id = Uuid::new_v4();
        log::info!("[{}] Publishing user text ({} chars)", request_id, text.chars().count());

        let outcome = match self.validator.validate_text(text) {
            Ok(post) => self.submit(request_id, post).await,
            Err(error) => Err(PipelineFailure::Validation {
                error,
                text: text.to_string(),
            }),
        };
        finish(request_id, outcome)
    }

    async fn submit(
        &self,
        request_id: Uuid,
        post: ValidatedPost,
    ) -> Result<PublishResult, PipelineFailure> {
        log::info!("[{}] Submitting post ({} chars)", request_id, post.char_count());
        let id = self
            .publisher
            .create_post(&post)
            .await
            .map_err(PipelineFailure::Publish)?;
        let post_url = self.publisher.post_url(&id);
        Ok(PublishResult::success(id, post.into_text(), post_url))
    }
}

/// Runs requests through generate, validate, repair and publish.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct PublishOrchestrator {
    drafter: Drafter,
    poster: TextPublisher,
}

impl PublishOrchestrator {
    pub fn new(
        generator: ContentGenerator,
        validator: PostValidator,
        publisher: Publisher,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            drafter: Drafter::new(generator, validator.clone(), settings),
            poster: TextPublisher::new(validator, publisher),
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.poster.publisher
    }

    /// Generates, validates and publishes a post.
    pub async fn publish(&self, request: &GenerationRequest) -> PublishResult {
        let request_id = Uuid::new_v4();
        log::info!(
            "[{}] Publishing {} post about '{}'",
            request_id,
            request.tone,
            request.topic
        );

        let outcome = match self.drafter.prepare(request_id, request).await {
            Ok(post) => self.poster.submit(request_id, post).await,
            Err(failure) => Err(failure),
        };
        finish(request_id, outcome)
    }

    /// Generates and validates a post without publishing it.
    pub async fn draft(&self, request: &GenerationRequest) -> Result<ValidatedPost, PipelineFailure> {
        self.drafter.draft(request).await
    }

    /// Validates and publishes text supplied by the user.
    pub async fn publish_text(&self, text: &str) -> PublishResult {
        self.poster.publish_text(text).await
    }

    /// Like [`publish`](Self::publish), stopping when `token` is cancelled.
    ///
    /// Cancelling before the create call yields a `Cancelled` failure.
    /// Cancelling during it abandons the call and reports an unknown outcome.
    pub async fn publish_until_cancelled(
        &self,
        request: &GenerationRequest,
        token: &CancellationToken,
    ) -> PublishResult {
        let request_id = Uuid::new_v4();
        log::info!(
            "[{}] Publishing {} post about '{}' (cancellable)",
            request_id,
            request.tone,
            request.topic
        );

        let prepared = tokio::select! {
            biased;
            _ = token.cancelled() => Err(PipelineFailure::Cancelled),
            prepared = self.drafter.prepare(request_id, request) => prepared,
        };

        let outcome = match prepared {
            Ok(_) if token.is_cancelled() => Err(PipelineFailure::Cancelled),
            Ok(post) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(PipelineFailure::CancelledInFlight),
                submitted = self.poster.submit(request_id, post) => submitted,
            },
            Err(failure) => Err(failure),
        };
        finish(request_id, outcome)
    }
}

fn draft_len(error: &ValidationError) -> usize {
    error
        .violations
        .iter()
        .find_map(|v| match v {
            Violation::TooLong { length, .. } => Some(*length),
            _ => None,
        })
        .unwrap_or_default()
}

fn finish(request_id: Uuid, outcome: Result<PublishResult, PipelineFailure>) -> PublishResult {
    let result = outcome.unwrap_or_else(PublishResult::from);
    if result.is_success() {
        log::info!("[{}] {}", request_id, result);
    } else if result.outcome_unknown() {
        log::error!("[{}] {}", request_id, result);
    } else {
        log::warn!("[{}] {}", request_id, result);
    }
    result
}

#[async_trait::async_trait]
impl PostPipeline for PublishOrchestrator {
    async fn publish(&self, topic: &str, tone: &str) -> Result<PublishResult, InvalidToneError> {
        let tone: Tone = tone.parse()?;
        let topic = match Topic::new(topic) {
            Ok(topic) => topic,
            Err(_) => {
                let failure =
                    PipelineFailure::Generation(GenerationError::new(GenerationCause::EmptyPrompt));
                return Ok(finish(Uuid::new_v4(), Err(failure)));
            }
        };
        Ok(PublishOrchestrator::publish(self, &GenerationRequest::new(topic, tone)).await)
    }
}
