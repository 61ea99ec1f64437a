use crate::error::InvalidToneError;
use crate::types::{PostLength, Tone, Topic};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Optional content requirements rendered into the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOptions {
    pub hashtags: bool,
    pub call_to_action: bool,
    pub emojis: bool,
    pub audience: Option<String>,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            hashtags: true,
            call_to_action: true,
            emojis: true,
            audience: None,
        }
    }
}

/// One user request to draft a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: Topic,
    pub tone: Tone,
    pub length: PostLength,
    pub options: PostOptions,
    /// Extra free-form requirements, rendered in insertion order
    pub constraints: IndexMap<String, String>,
}

impl GenerationRequest {
    pub fn new(topic: Topic, tone: Tone) -> Self {
        Self {
            topic,
            tone,
            length: PostLength::default(),
            options: PostOptions::default(),
            constraints: IndexMap::new(),
        }
    }

    /// Builds a request from a raw tone selector, surfacing unknown tones.
    pub fn from_selector(topic: Topic, tone: &str) -> Result<Self, InvalidToneError> {
        Ok(Self::new(topic, tone.parse()?))
    }

    pub fn with_length(mut self, length: PostLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_options(mut self, options: PostOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_constraint(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.insert(name.into(), value.into());
        self
    }
}
