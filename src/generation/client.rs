// src/generation/client.rs
//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Handles authentication, request encoding and mapping of provider
//! responses onto [`GenerationCause`]. It performs exactly one attempt per
//! call; retrying is the orchestrator's decision.

use super::responses::{ChatCompletionBody, ChatCompletionResponse, ProviderErrorBody};
use super::{Completion, CompletionRequest, TextGenerator};
use crate::config::GeneratorConfig;
use crate::error::{AppError, GenerationCause, GenerationError};
use crate::http::{extract_response_text, pooled_client, preview_body, ApiResponse, PoolConfig};
use reqwest::{Client, StatusCode};

/// Chat-completions client bound to one provider and model.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    config: GeneratorConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, AppError> {
        let client = pooled_client(&PoolConfig::default())?;
        Ok(Self { client, config })
    }

    fn transport_failure(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::new(GenerationCause::Timeout(self.config.timeout))
        } else {
            GenerationError::new(GenerationCause::Transport(error.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError> {
        let url = self.config.base_url.join_segments(&["chat", "completions"]);
        let body = ChatCompletionBody {
            model: self.config.model.as_str(),
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        log::debug!(
            "POST {} (model {}, {} messages)",
            url,
            self.config.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.api_key.as_str())
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let result = extract_response_text(response)
            .await
            .map_err(|e| self.transport_failure(e))?;

        parse_completion(result)
    }
}

/// Maps a raw provider response onto a completion or a typed failure.
fn parse_completion(result: ApiResponse<String>) -> Result<Completion, GenerationError> {
    if !result.status.is_success() {
        return Err(GenerationError::new(classify_status(&result)));
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse completion from {}: {}", result.url, e);
        GenerationError::new(GenerationCause::Malformed(format!(
            "{}: {}",
            e,
            preview_body(&result.data)
        )))
    })?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        GenerationError::new(GenerationCause::Malformed(
            "response contains no choices".to_string(),
        ))
    })?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(Completion {
            text,
            model: parsed.model,
        }),
        _ => Err(GenerationError::new(GenerationCause::EmptyResponse)),
    }
}

fn classify_status(result: &ApiResponse<String>) -> GenerationCause {
    match result.status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationCause::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => GenerationCause::RateLimited {
            retry_after: result.retry_after,
        },
        status => {
            let message = serde_json::from_str::<ProviderErrorBody>(&result.data)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| preview_body(&result.data));
            GenerationCause::Provider {
                status: status.as_u16(),
                message,
            }
        }
    }
}
