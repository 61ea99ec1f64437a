// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Shared checks for bearer credentials.
fn check_credential(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::InvalidCredential {
            reason: "credential cannot be empty".to_string(),
        });
    }

    if value.chars().any(char::is_whitespace) {
        return Err(FieldError::InvalidCredential {
            reason: "credential cannot contain whitespace".to_string(),
        });
    }

    if value.len() < 8 {
        return Err(FieldError::InvalidCredential {
            reason: "credential is too short".to_string(),
        });
    }

    Ok(())
}

/// Redacts all but the first few characters of a secret.
fn redact(f: &mut fmt::Formatter<'_>, secret: &str) -> fmt::Result {
    let visible: String = secret.chars().take(4).collect();
    write!(f, "{}...", visible)
}

/// API key for the text-generation service.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, FieldError> {
        let key = key.into();
        check_credential(&key)?;
        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redact(f, &self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(")?;
        redact(f, &self.0)?;
        f.write_str(")")
    }
}

/// OAuth access token for the publishing platform.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, FieldError> {
        let token = token.into();
        check_credential(&token)?;
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redact(f, &self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(")?;
        redact(f, &self.0)?;
        f.write_str(")")
    }
}

/// Validated URL type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl Serialize for ValidatedUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidatedUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ValidatedUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl ValidatedUrl {
    /// Create a new validated URL
    pub fn parse(url: &str) -> Result<Self, FieldError> {
        match Url::parse(url) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(FieldError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                if parsed_url.cannot_be_a_base() {
                    return Err(FieldError::InvalidUrl {
                        url: url.to_string(),
                        reason: "URL cannot be used as a base".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(FieldError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Get the URL as a string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Joins path segments onto this URL, percent-encoding each segment.
    ///
    /// A trailing slash on the base is ignored, so `https://host/v1/` and
    /// `https://host/v1` produce the same endpoint.
    pub fn join_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subject a post is written about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(topic: impl Into<String>) -> Result<Self, FieldError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(FieldError::EmptyField("topic"));
        }
        Ok(Self(topic))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier the platform assigned to a created post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePostId(String);

impl RemotePostId {
    pub fn new(id: impl Into<String>) -> Result<Self, FieldError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(FieldError::InvalidPostId {
                reason: "post id cannot be empty".to_string(),
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemotePostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of the generation model, e.g. `llama-3.3-70b-versatile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Result<Self, FieldError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldError::EmptyField("model"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a `key=value` constraint given on the command line.
pub fn parse_constraint(input: &str) -> Result<(String, String), FieldError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| FieldError::InvalidConstraint {
            input: input.to_string(),
        })?;

    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(FieldError::InvalidConstraint {
            input: input.to_string(),
        });
    }

    Ok((key.to_string(), value.to_string()))
}
