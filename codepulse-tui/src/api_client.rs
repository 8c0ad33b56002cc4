//! API client layer: named resource reads over REST.

use crate::config::TuiConfig;
use async_trait::async_trait;
use codepulse_core::{Resource, ResourceKey, TransportError};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Reads one named resource from the backend.
///
/// The query cache only sees this trait, so tests can drive it with scripted
/// responses instead of a live server.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, key: &ResourceKey) -> Result<Resource, TransportError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(&config.api_base_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiClientError::Config("base URL must not be empty".to_string()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, key: &ResourceKey) -> String {
        format!("{}{}", self.base_url, key.path())
    }
}

#[async_trait]
impl ResourceFetcher for RestClient {
    async fn fetch(&self, key: &ResourceKey) -> Result<Resource, TransportError> {
        let url = self.url_for(key);
        tracing::debug!(key = %key, url = %url, "Fetching resource");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(key = %key, status = status.as_u16(), "Resource request failed");
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        Resource::decode(key, &body).map_err(|err| {
            tracing::warn!(key = %key, error = %err, "Resource body could not be decoded");
            err
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Parse(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}
