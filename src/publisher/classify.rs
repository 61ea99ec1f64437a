// src/publisher/classify.rs
//! Maps platform responses and transport failures onto [`PublisherErrorKind`].

use crate::error::{PublisherError, PublisherErrorKind};
use crate::http::{preview_body, ApiResponse};
use reqwest::StatusCode;
use std::fmt;

/// A platform operation, as far as failure classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreatePost,
    DeletePost,
    FetchProfile,
}

impl Operation {
    /// Whether repeating the operation cannot create duplicate effects.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Operation::CreatePost)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreatePost => write!(f, "create_post"),
            Operation::DeletePost => write!(f, "delete_post"),
            Operation::FetchProfile => write!(f, "fetch_profile"),
        }
    }
}

/// Classifies a non-success HTTP response.
pub fn classify_status(operation: Operation, result: &ApiResponse<String>) -> PublisherError {
    let status = result.status;
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PublisherErrorKind::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => PublisherErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT => PublisherErrorKind::Transient,
        s if s.is_server_error() => PublisherErrorKind::Transient,
        s if s.is_client_error() => PublisherErrorKind::PermanentRejected,
        _ => ambiguous(operation),
    };

    let body = preview_body(&result.data);
    let message = if body.is_empty() {
        format!("{} returned HTTP {}", operation, status)
    } else {
        format!("{} returned HTTP {}: {}", operation, status, body)
    };

    let error = PublisherError::new(kind, message).with_status(status.as_u16());
    if kind == PublisherErrorKind::RateLimited {
        error.with_retry_after(result.retry_after)
    } else {
        error
    }
}

/// Classifies a failure to send the request or to read the response.
///
/// A connection that was never established is safe to retry. Anything that
/// fails after the request may have reached the platform is ambiguous for
/// non-idempotent operations.
pub fn classify_transport(operation: Operation, error: &reqwest::Error) -> PublisherError {
    let kind = if error.is_connect() {
        PublisherErrorKind::Transient
    } else {
        ambiguous(operation)
    };
    let what = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "could not connect"
    } else {
        "connection failed"
    };
    PublisherError::new(kind, format!("{} {}: {}", operation, what, error))
}

/// Classifies a success status whose body could not be understood.
pub fn undecodable_body(operation: Operation, status: StatusCode, detail: &str) -> PublisherError {
    PublisherError::new(
        PublisherErrorKind::Unknown,
        format!(
            "{} returned HTTP {} with an unreadable body: {}",
            operation, status, detail
        ),
    )
    .with_status(status.as_u16())
}

fn ambiguous(operation: Operation) -> PublisherErrorKind {
    if operation.is_idempotent() {
        PublisherErrorKind::Transient
    } else {
        PublisherErrorKind::Unknown
    }
}
