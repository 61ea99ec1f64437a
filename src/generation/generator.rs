// src/generation/generator.rs
//! Content generator — turns a [`GenerationRequest`] into a [`DraftPost`].

use super::{ChatMessage, Completion, CompletionRequest, TextGenerator};
use crate::constants::{ADVICE_MAX_TOKENS, ADVICE_TEMPERATURE};
use crate::error::{AppError, GenerationCause, GenerationError};
use crate::model::{DraftPost, GenerationRequest};
use crate::tone::{self, PromptRenderer, ADVISORY_SYSTEM, WRITER_SYSTEM};
use std::sync::Arc;
use std::time::Duration;

/// Builds prompts, calls the provider under a timeout and wraps the result.
///
/// Never retries and never substitutes placeholder text: a provider problem
/// always comes back as a [`GenerationError`].
#[derive(Clone)]
pub struct ContentGenerator {
    backend: Arc<dyn TextGenerator>,
    renderer: PromptRenderer,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            backend,
            renderer: PromptRenderer::new()?,
            timeout,
        })
    }

    /// Drafts a post for `request`.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<DraftPost, GenerationError> {
        let template = tone::resolve(request.tone);
        let prompt = self.renderer.render(&template, request)?;

        let completion = self
            .complete(&CompletionRequest {
                messages: vec![ChatMessage::system(WRITER_SYSTEM), ChatMessage::user(prompt)],
                max_tokens: request.length.max_tokens(),
                temperature: template.style.temperature,
            })
            .await?;

        let text = completion.text.trim();
        if text.is_empty() {
            return Err(GenerationError::new(GenerationCause::EmptyResponse));
        }

        log::info!(
            "Generated {} draft for '{}' ({} chars)",
            request.tone,
            request.topic,
            text.chars().count()
        );
        Ok(DraftPost::generated(text, request.tone))
    }

    /// Answers a strategy question, given the earlier conversation.
    pub async fn advise(
        &self,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, GenerationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(GenerationError::new(GenerationCause::EmptyPrompt));
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(ADVISORY_SYSTEM));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let completion = self
            .complete(&CompletionRequest {
                messages,
                max_tokens: ADVICE_MAX_TOKENS,
                temperature: ADVICE_TEMPERATURE,
            })
            .await?;

        let advice = completion.text.trim();
        if advice.is_empty() {
            return Err(GenerationError::new(GenerationCause::EmptyResponse));
        }
        Ok(advice.to_string())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError> {
        match tokio::time::timeout(self.timeout, self.backend.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Generation timed out after {:?}", self.timeout);
                Err(GenerationError::new(GenerationCause::Timeout(self.timeout)))
            }
        }
    }
}
