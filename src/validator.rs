// src/validator.rs
//! Platform rules a post must satisfy before submission.
//!
//! Every check runs on every draft and all violations are reported together,
//! so the caller can choose to repair a draft instead of discarding it.

use crate::constants::{DEFAULT_MAX_POST_CHARS, TRUNCATION_MARKER};
use crate::model::{DraftPost, ValidatedPost};
use crate::types::FieldError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Character repertoire the platform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptedEncoding {
    /// Any Unicode scalar except control characters and U+FFFD
    #[default]
    Unicode,
    /// Code points up to U+00FF
    Latin1,
    /// Seven-bit ASCII
    Ascii,
}

impl AcceptedEncoding {
    pub fn accepts(&self, c: char) -> bool {
        let printable = !(c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
            && c != char::REPLACEMENT_CHARACTER;

        printable
            && match self {
                AcceptedEncoding::Unicode => true,
                AcceptedEncoding::Latin1 => u32::from(c) <= 0xFF,
                AcceptedEncoding::Ascii => c.is_ascii(),
            }
    }
}

impl fmt::Display for AcceptedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptedEncoding::Unicode => write!(f, "unicode"),
            AcceptedEncoding::Latin1 => write!(f, "latin1"),
            AcceptedEncoding::Ascii => write!(f, "ascii"),
        }
    }
}

impl FromStr for AcceptedEncoding {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" | "utf8" | "utf-8" => Ok(AcceptedEncoding::Unicode),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(AcceptedEncoding::Latin1),
            "ascii" => Ok(AcceptedEncoding::Ascii),
            _ => Err(FieldError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Platform constraints, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub max_chars: usize,
    pub encoding: AcceptedEncoding,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_POST_CHARS,
            encoding: AcceptedEncoding::default(),
        }
    }
}

/// Category of a rule breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    TooLong,
    Empty,
    UnsupportedEncoding,
}

/// A single rule breach with the details needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    TooLong {
        length: usize,
        max: usize,
    },
    Empty,
    UnsupportedCharacters {
        count: usize,
        first: char,
        encoding: AcceptedEncoding,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::TooLong { .. } => ViolationKind::TooLong,
            Violation::Empty => ViolationKind::Empty,
            Violation::UnsupportedCharacters { .. } => ViolationKind::UnsupportedEncoding,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooLong { length, max } => {
                write!(f, "post is {} characters, limit is {}", length, max)
            }
            Violation::Empty => write!(f, "post is empty after trimming whitespace"),
            Violation::UnsupportedCharacters {
                count,
                first,
                encoding,
            } => write!(
                f,
                "post contains {} character(s) outside the accepted {} encoding (first: U+{:04X})",
                count,
                encoding,
                u32::from(*first)
            ),
        }
    }
}

/// The full set of violations found in one draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Post violates platform rules: {}", describe(violations))]
pub struct ValidationError {
    /// Violations in check order: length, emptiness, encoding
    pub violations: Vec<Violation>,
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn kinds(&self) -> BTreeSet<ViolationKind> {
        self.violations.iter().map(Violation::kind).collect()
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind() == kind)
    }
}

/// Checks drafts against [`ValidationRules`].
#[derive(Debug, Clone, Default)]
pub struct PostValidator {
    rules: ValidationRules,
}

impl PostValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Runs every check and returns either the validated post or all violations.
    pub fn validate(&self, draft: &DraftPost) -> Result<ValidatedPost, ValidationError> {
        let mut violations = Vec::new();
        let length = draft.char_count();

        if length > self.rules.max_chars {
            violations.push(Violation::TooLong {
                length,
                max: self.rules.max_chars,
            });
        }

        if draft.text.trim().is_empty() {
            violations.push(Violation::Empty);
        }

        let mut rejected = draft
            .text
            .chars()
            .filter(|c| !self.rules.encoding.accepts(*c));
        if let Some(first) = rejected.next() {
            violations.push(Violation::UnsupportedCharacters {
                count: 1 + rejected.count(),
                first,
                encoding: self.rules.encoding,
            });
        }

        if violations.is_empty() {
            Ok(ValidatedPost::new(draft, length))
        } else {
            log::debug!("Draft rejected with {} violation(s)", violations.len());
            Err(ValidationError { violations })
        }
    }

    /// Validates text written or edited by the user.
    pub fn validate_text(&self, text: &str) -> Result<ValidatedPost, ValidationError> {
        self.validate(&DraftPost::manual(text))
    }
}

/// Shortens `text` to at most `max_chars` characters.
///
/// Cuts at the last whitespace in the second half of the allowed prefix when
/// there is one, then appends a truncation marker.
pub fn truncate_to_limit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return text.chars().take(max_chars).collect();
    }

    let budget = max_chars - marker_len;
    let prefix_end = text
        .char_indices()
        .nth(budget)
        .map_or(text.len(), |(idx, _)| idx);
    let prefix = &text[..prefix_end];

    let cut = prefix
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, _)| idx)
        .filter(|idx| prefix[..*idx].chars().count() > budget / 2)
        .unwrap_or(prefix.len());

    let mut shortened = prefix[..cut].trim_end().to_string();
    shortened.push_str(TRUNCATION_MARKER);
    shortened
}
