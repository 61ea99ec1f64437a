//! Platform publishing — create, delete and profile operations against the
//! social platform's REST API.
//!
//! [`PlatformApi`] is the single-attempt transport seam; [`Publisher`] layers
//! the retry policy on top of it.

pub mod classify;
pub mod client;
mod service;

pub use classify::Operation;
pub use client::PlatformHttpClient;
pub use service::Publisher;

use crate::error::PublisherError;
use crate::model::Profile;
use crate::types::RemotePostId;

/// Platform operations, each performed exactly once per call.
#[async_trait::async_trait]
pub trait PlatformApi: Send + Sync {
    /// `POST /posts {text}`
    async fn create_post(&self, text: &str) -> Result<RemotePostId, PublisherError>;

    /// `DELETE /posts/{id}`
    async fn delete_post(&self, id: &RemotePostId) -> Result<(), PublisherError>;

    /// `GET /profile`
    async fn fetch_profile(&self) -> Result<Profile, PublisherError>;
}
