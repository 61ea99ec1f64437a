//! HTTP plumbing shared by the generator and publisher clients.

pub mod connection_pool;

pub use connection_pool::{pooled_client, PoolConfig};

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
    /// Parsed `Retry-After` header, when present
    pub retry_after: Option<Duration>,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(
    response: Response,
) -> Result<ApiResponse<String>, reqwest::Error> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after = parse_retry_after(response.headers());
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
        retry_after,
    })
}

/// Reads a `Retry-After` header given in (possibly fractional) seconds.
///
/// Hints too large for a `Duration` saturate to `Duration::MAX`, which the
/// retry policy treats as longer than it will wait. HTTP-date values are
/// ignored; callers fall back to their own backoff.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let seconds = match raw.parse::<f64>() {
        Ok(seconds) if !seconds.is_nan() => seconds,
        _ => {
            log::debug!("Ignoring Retry-After '{}': not a number of seconds", raw);
            return None;
        }
    };
    Some(Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX))
}

/// Shortens a response body for logs and error messages.
pub fn preview_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", preview)
    } else {
        body.to_string()
    }
}
