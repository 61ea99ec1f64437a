use thiserror::Error;

mod domain_types;
mod tone;

pub use domain_types::*;
pub use tone::*;

/// A value that failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid credential format: {reason}")]
    InvalidCredential { reason: String },

    #[error("Invalid post id: {reason}")]
    InvalidPostId { reason: String },

    #[error("Invalid constraint '{input}': expected key=value")]
    InvalidConstraint { input: String },

    #[error("Unknown post length '{0}' (expected one of: short, medium, long)")]
    UnknownLength(String),

    #[error("Unknown encoding '{0}' (expected one of: unicode, latin1, ascii)")]
    UnknownEncoding(String),

    #[error("Unknown repair policy '{0}' (expected one of: truncate, abort)")]
    UnknownRepairPolicy(String),
}
