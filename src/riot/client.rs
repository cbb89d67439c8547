use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::AppError;

use super::metrics::RequestMetrics;
use super::types::{RiotApiError, RiotApiResponse};

/// Trait implemented by structures capable of performing raw HTTP requests to the riot API.
#[async_trait]
pub trait ApiRequest: Send + Sync + fmt::Debug {
    async fn request(&self, url: String) -> RiotApiResponse<Bytes>;
}

/// Authenticated reqwest transport. The key only ever travels in the `X-Riot-Token` header.
pub struct HttpTransport {
    client: reqwest::Client,
    /// Riot API Key
    key: String,
    metrics: Arc<RequestMetrics>,
}

impl HttpTransport {
    pub fn new(
        key: String,
        timeout: Duration,
        metrics: Arc<RequestMetrics>,
    ) -> Result<Self, AppError> {
        if key.trim().is_empty() {
            return Err(AppError::Config("Riot API key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            key: key.trim().to_string(),
            metrics,
        })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("key", &"<redacted>")
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[async_trait]
impl ApiRequest for HttpTransport {
    async fn request(&self, url: String) -> RiotApiResponse<Bytes> {
        self.metrics.inc();
        let resource = resource_of(&url).to_string();

        let res = self
            .client
            .get(&url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await
            .map_err(|source| {
                self.metrics.inc_failure();
                RiotApiError::Transport {
                    resource: resource.clone(),
                    source,
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            self.metrics.inc_failure();
            return Err(RiotApiError::Status { resource, status });
        }

        res.bytes()
            .await
            .map_err(|source| RiotApiError::Transport { resource, source })
    }
}

/// Typed front of an [`ApiRequest`] transport, shared by every endpoint.
#[derive(Debug, Clone)]
pub struct RiotClient {
    transport: Arc<dyn ApiRequest>,
}

impl RiotClient {
    pub fn new(transport: Arc<dyn ApiRequest>) -> Self {
        Self { transport }
    }

    /// GET `url` and decode the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> RiotApiResponse<T> {
        tracing::trace!(resource = resource_of(url), "[RIOT::CLIENT] GET");

        let raw = self.transport.request(url.to_string()).await?;

        serde_json::from_slice(&raw).map_err(|source| RiotApiError::Decode {
            resource: resource_of(url).to_string(),
            source,
        })
    }
}

/// URL without its query string, used to identify a resource in errors and logs.
pub fn resource_of(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
