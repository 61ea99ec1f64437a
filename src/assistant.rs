// src/assistant.rs
//! Chat assistant — content-strategy advice through the generator.
//!
//! Questions go to the model with the fixed advisory prompt. Nothing here
//! validates or publishes.

use crate::constants::CHAT_HISTORY_LIMIT;
use crate::error::GenerationError;
use crate::generation::{ChatMessage, ContentGenerator};
use crate::pipeline::Advisor;
use std::collections::VecDeque;

/// Stateless advisor: each question is answered on its own.
#[derive(Clone)]
pub struct ChatAssistant {
    generator: ContentGenerator,
}

impl ChatAssistant {
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }

    pub async fn ask(&self, question: &str) -> Result<String, GenerationError> {
        self.generator.advise(&[], question).await
    }

    /// Starts a conversation that remembers recent turns.
    pub fn session(&self) -> ChatSession {
        ChatSession::new(self.clone(), CHAT_HISTORY_LIMIT)
    }
}

#[async_trait::async_trait]
impl Advisor for ChatAssistant {
    async fn ask(&self, question: &str) -> Result<String, GenerationError> {
        ChatAssistant::ask(self, question).await
    }
}

/// A conversation with the assistant.
///
/// Keeps at most `limit` messages, rounded up to whole question/answer
/// pairs; the oldest pair is dropped first. Failed questions leave the
/// transcript untouched.
pub struct ChatSession {
    assistant: ChatAssistant,
    history: VecDeque<ChatMessage>,
    limit: usize,
}

impl ChatSession {
    pub fn new(assistant: ChatAssistant, limit: usize) -> Self {
        Self {
            assistant,
            history: VecDeque::new(),
            limit: limit.saturating_add(limit % 2),
        }
    }

    pub async fn ask(&mut self, question: &str) -> Result<String, GenerationError> {
        let history: Vec<ChatMessage> = self.history.iter().cloned().collect();
        let answer = self.assistant.generator.advise(&history, question).await?;

        self.history.push_back(ChatMessage::user(question.trim()));
        self.history.push_back(ChatMessage::assistant(answer.clone()));
        while self.history.len() > self.limit {
            self.history.drain(..2);
        }
        Ok(answer)
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing chat history ({} messages)", self.history.len());
        self.history.clear();
    }
}
