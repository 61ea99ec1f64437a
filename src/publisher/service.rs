// src/publisher/service.rs
use super::PlatformApi;
use crate::error::PublisherError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Profile, ValidatedPost};
use crate::types::RemotePostId;
use std::sync::Arc;

/// Platform operations with retry and backoff.
///
/// Only `Transient` and `RateLimited` failures are retried. An ambiguous
/// create (`Unknown`) is surfaced at once so a post is never created twice.
#[derive(Clone)]
pub struct Publisher {
    api: Arc<dyn PlatformApi>,
    policy: RetryPolicy,
    post_url_template: Option<String>,
}

impl Publisher {
    pub fn new(api: Arc<dyn PlatformApi>, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            post_url_template: None,
        }
    }

    /// Template for public post links; `{id}` is replaced by the encoded id.
    pub fn with_post_url_template(mut self, template: Option<String>) -> Self {
        self.post_url_template = template;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Publishes a post that already passed validation.
    pub async fn create_post(&self, post: &ValidatedPost) -> Result<RemotePostId, PublisherError> {
        let api = &self.api;
        let text = post.text();
        let result = retry_with_backoff(&self.policy, "create_post", move |attempt| {
            log::debug!("create_post attempt {} ({} chars)", attempt, post.char_count());
            api.create_post(text)
        })
        .await;

        match &result {
            Ok(id) => log::info!("Created post {}", id),
            Err(e) if e.is_ambiguous() => {
                log::error!("Post creation outcome unknown, not retrying: {}", e)
            }
            Err(e) => log::error!("Post creation failed: {}", e),
        }
        result
    }

    pub async fn delete_post(&self, id: &RemotePostId) -> Result<(), PublisherError> {
        let api = &self.api;
        retry_with_backoff(&self.policy, "delete_post", move |_| api.delete_post(id)).await?;
        log::info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn fetch_profile(&self) -> Result<Profile, PublisherError> {
        let api = &self.api;
        retry_with_backoff(&self.policy, "fetch_profile", move |_| api.fetch_profile()).await
    }

    /// Checks that the token is accepted by fetching the profile.
    pub async fn verify_connection(&self) -> Result<Profile, PublisherError> {
        let profile = self.fetch_profile().await?;
        log::info!("Platform connection verified for {}", profile.display_name());
        Ok(profile)
    }

    /// Public link for a created post, when a template is configured.
    pub fn post_url(&self, id: &RemotePostId) -> Option<String> {
        let template = self.post_url_template.as_deref()?;
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
        Some(template.replace("{id}", &encoded))
    }
}
