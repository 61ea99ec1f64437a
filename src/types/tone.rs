// src/types/tone.rs
//! Closed vocabularies selected by the user: tone and post length.

use super::FieldError;
use crate::error::InvalidToneError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The voice a post is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Inspirational,
    Educational,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Inspirational,
        Tone::Educational,
    ];

    /// Lowercase selector used on the command line and in template names.
    pub fn selector(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Inspirational => "inspirational",
            Tone::Educational => "educational",
        }
    }
}

impl FromStr for Tone {
    type Err = InvalidToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.selector().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InvalidToneError(s.to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

/// Target length of a generated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl PostLength {
    /// Human-readable word range placed in the prompt.
    pub fn word_range(&self) -> &'static str {
        match self {
            PostLength::Short => "50-100 words",
            PostLength::Medium => "100-200 words",
            PostLength::Long => "200-300 words",
        }
    }

    /// Completion token budget for this length.
    pub fn max_tokens(&self) -> u32 {
        match self {
            PostLength::Short => 400,
            PostLength::Medium => 700,
            PostLength::Long => 1000,
        }
    }
}

impl FromStr for PostLength {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(PostLength::Short),
            "medium" => Ok(PostLength::Medium),
            "long" => Ok(PostLength::Long),
            _ => Err(FieldError::UnknownLength(s.to_string())),
        }
    }
}
