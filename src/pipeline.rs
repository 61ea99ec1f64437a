// src/pipeline.rs
//! Presentation boundary — the two capabilities a user interface consumes.
//!
//! Each trait describes a single capability, so a front end can be driven by
//! stubs in tests.

use crate::error::{GenerationError, InvalidToneError};
use crate::model::PublishResult;

/// Generates, validates and publishes a post about a topic.
#[async_trait::async_trait]
pub trait PostPipeline: Send + Sync {
    /// Fails only for an unknown tone selector; every other problem is
    /// reported as a non-success [`PublishResult`].
    async fn publish(&self, topic: &str, tone: &str) -> Result<PublishResult, InvalidToneError>;
}

/// Answers free-form questions about content strategy.
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, GenerationError>;
}
