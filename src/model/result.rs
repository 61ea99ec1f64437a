use crate::error::PublisherErrorKind;
use crate::types::RemotePostId;
use std::fmt;

/// Terminal state of a publish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    /// The post exists on the platform
    Success,
    /// The content broke a platform rule and was never submitted
    Rejected,
    /// A remote call failed or the request was cancelled
    Failed,
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStatus::Success => write!(f, "success"),
            PublishStatus::Rejected => write!(f, "rejected"),
            PublishStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The pipeline stage that ended a non-successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Generation,
    Validation,
    Publish(PublisherErrorKind),
    Cancelled,
}

/// Outcome of one publish request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    status: PublishStatus,
    remote_post_id: Option<RemotePostId>,
    reason: Option<String>,
    failure: Option<FailureStage>,
    post_url: Option<String>,
    text: Option<String>,
}

impl PublishResult {
    pub(crate) fn success(id: RemotePostId, text: String, post_url: Option<String>) -> Self {
        Self {
            status: PublishStatus::Success,
            remote_post_id: Some(id),
            reason: None,
            failure: None,
            post_url,
            text: Some(text),
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>, text: Option<String>) -> Self {
        Self {
            status: PublishStatus::Rejected,
            remote_post_id: None,
            reason: Some(reason.into()),
            failure: Some(FailureStage::Validation),
            post_url: None,
            text,
        }
    }

    pub(crate) fn failed(stage: FailureStage, reason: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Failed,
            remote_post_id: None,
            reason: Some(reason.into()),
            failure: Some(stage),
            post_url: None,
            text: None,
        }
    }

    pub fn status(&self) -> PublishStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == PublishStatus::Success
    }

    pub fn remote_post_id(&self) -> Option<&RemotePostId> {
        self.remote_post_id.as_ref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn failure(&self) -> Option<FailureStage> {
        self.failure
    }

    /// Link to the published post, when a URL template is configured.
    pub fn post_url(&self) -> Option<&str> {
        self.post_url.as_deref()
    }

    /// The text that was (or would have been) submitted.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when the post may exist on the platform even though the request
    /// failed. Callers should check the platform before trying again.
    pub fn outcome_unknown(&self) -> bool {
        self.failure == Some(FailureStage::Publish(PublisherErrorKind::Unknown))
    }
}

impl fmt::Display for PublishResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.remote_post_id, &self.reason) {
            (Some(id), _) => write!(f, "{} (post {})", self.status, id),
            (None, Some(reason)) => write!(f, "{}: {}", self.status, reason),
            (None, None) => write!(f, "{}", self.status),
        }
    }
}
