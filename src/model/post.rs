use crate::types::Tone;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Generated text that has not been checked against platform rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPost {
    pub text: String,
    pub tone: Option<Tone>,
    pub generated_at: DateTime<Utc>,
}

impl DraftPost {
    pub fn generated(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
            generated_at: Utc::now(),
        }
    }

    /// A draft written or edited by the user rather than the model.
    pub fn manual(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
            generated_at: Utc::now(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Post text that satisfied every validator check.
///
/// Only [`crate::validator::PostValidator`] can construct one, so holding a
/// `ValidatedPost` proves the text is safe to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedPost {
    text: String,
    tone: Option<Tone>,
    char_count: usize,
}

impl ValidatedPost {
    pub(crate) fn new(draft: &DraftPost, char_count: usize) -> Self {
        Self {
            text: draft.text.clone(),
            tone: draft.tone,
            char_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
