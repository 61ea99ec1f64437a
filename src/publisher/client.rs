// src/publisher/client.rs
//! HTTP implementation of [`PlatformApi`].

use super::classify::{classify_status, classify_transport, undecodable_body, Operation};
use super::PlatformApi;
use crate::config::PlatformConfig;
use crate::error::{AppError, PublisherError, PublisherErrorKind};
use crate::http::{extract_response_text, pooled_client, ApiResponse, PoolConfig};
use crate::model::Profile;
use crate::types::RemotePostId;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CreatePostBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    id: String,
}

#[derive(Deserialize)]
struct DeletePostResponse {
    success: bool,
}

/// Bearer-authenticated client for the platform REST API.
#[derive(Clone)]
pub struct PlatformHttpClient {
    client: Client,
    config: PlatformConfig,
}

impl PlatformHttpClient {
    pub fn new(config: PlatformConfig) -> Result<Self, AppError> {
        let client = pooled_client(&PoolConfig::default())?;
        Ok(Self { client, config })
    }

    /// Sends one request and returns the response when its status is 2xx.
    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<ApiResponse<String>, PublisherError> {
        let response = request
            .bearer_auth(self.config.access_token.as_str())
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| classify_transport(operation, &e))?;

        let result = extract_response_text(response)
            .await
            .map_err(|e| classify_transport(operation, &e))?;

        log::debug!("{} {} -> {}", operation, result.url, result.status);

        if result.status.is_success() {
            Ok(result)
        } else {
            Err(classify_status(operation, &result))
        }
    }
}

fn decode<T: DeserializeOwned>(
    operation: Operation,
    result: &ApiResponse<String>,
) -> Result<T, PublisherError> {
    serde_json::from_str(&result.data)
        .map_err(|e| undecodable_body(operation, result.status, &e.to_string()))
}

#[async_trait::async_trait]
impl PlatformApi for PlatformHttpClient {
    async fn create_post(&self, text: &str) -> Result<RemotePostId, PublisherError> {
        let operation = Operation::CreatePost;
        let url = self.config.api_url.join_segments(&["posts"]);
        let request = self.client.post(url).json(&CreatePostBody { text });

        let result = self.send(operation, request).await?;
        let body: CreatePostResponse = decode(operation, &result)?;
        RemotePostId::new(body.id)
            .map_err(|e| undecodable_body(operation, result.status, &e.to_string()))
    }

    async fn delete_post(&self, id: &RemotePostId) -> Result<(), PublisherError> {
        let operation = Operation::DeletePost;
        let url = self.config.api_url.join_segments(&["posts", id.as_str()]);
        let result = self.send(operation, self.client.delete(url)).await?;

        // 204 No Content carries no body to inspect
        if result.data.trim().is_empty() {
            return Ok(());
        }

        let body: DeletePostResponse = decode(operation, &result)?;
        if body.success {
            Ok(())
        } else {
            Err(PublisherError::new(
                PublisherErrorKind::PermanentRejected,
                format!("platform refused to delete post {}", id),
            )
            .with_status(result.status.as_u16()))
        }
    }

    async fn fetch_profile(&self) -> Result<Profile, PublisherError> {
        let operation = Operation::FetchProfile;
        let url = self.config.api_url.join_segments(&["profile"]);
        let result = self.send(operation, self.client.get(url)).await?;
        decode(operation, &result)
    }
}
