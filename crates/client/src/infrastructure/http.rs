//! reqwest-backed backend client.
//!
//! Acquisition is two-phase: resolve the backend address through a
//! [`BackendLocator`], then issue requests against the memoized base URL. A
//! transport failure drops the memo, re-resolves, and retries exactly once;
//! the backend may have been restarted on a new port in between.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use tokio::sync::RwLock;
use url::Url;

use crate::config::{normalize_prefix, ClientConfig};
use crate::infrastructure::ports::{
    BackendLocator, BackendResponse, BackendTransport, CacheMode, HttpMethod, RequestOptions,
    TransportError,
};

/// Client for the save editor backend
pub struct HttpClient {
    client: Client,
    locator: Arc<dyn BackendLocator>,
    api_prefix: String,
    base_url: RwLock<Option<Url>>,
}

impl HttpClient {
    pub fn new(
        locator: Arc<dyn BackendLocator>,
        api_prefix: &str,
        timeout: Option<Duration>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, ?timeout, "Failed to build HTTP client, using defaults without timeout");
            Client::new()
        });

        Self {
            client,
            locator,
            api_prefix: normalize_prefix(api_prefix),
            base_url: RwLock::new(None),
        }
    }

    pub fn from_config(locator: Arc<dyn BackendLocator>, config: &ClientConfig) -> Self {
        Self::new(locator, &config.api_prefix, config.request_timeout)
    }

    /// Resolve and memoize the backend base URL. Idempotent.
    pub async fn initialize(&self) -> Result<Url, TransportError> {
        if let Some(url) = self.base_url.read().await.as_ref() {
            return Ok(url.clone());
        }

        let mut guard = self.base_url.write().await;
        // Another caller may have resolved while we waited for the write lock.
        if let Some(url) = guard.as_ref() {
            return Ok(url.clone());
        }

        let url = self.locator.resolve().await?;
        tracing::info!(base_url = %url, "Resolved backend address");
        *guard = Some(url.clone());
        Ok(url)
    }

    /// Forget the memoized base URL so the next request re-resolves it.
    pub async fn reset(&self) {
        self.base_url.write().await.take();
    }

    /// The memoized base URL, if resolved.
    pub async fn base_url(&self) -> Option<Url> {
        self.base_url.read().await.clone()
    }

    fn endpoint_url(&self, base: &Url, endpoint: &str) -> Result<Url, TransportError> {
        let endpoint = endpoint.trim();
        let joined = format!(
            "{}{}/{}",
            base.as_str().trim_end_matches('/'),
            self.api_prefix,
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_once(
        &self,
        base: &Url,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<BackendResponse, TransportError> {
        let url = self.endpoint_url(base, endpoint)?;

        let mut request = match options.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        match options.cache {
            CacheMode::Default => {}
            CacheMode::NoStore => {
                request = request.header(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            }
            CacheMode::Reload => {
                request = request
                    .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                    .header(PRAGMA, HeaderValue::from_static("no-cache"));
            }
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(BackendResponse::new(status, BackendResponse::parse_body(&bytes)))
    }
}

#[async_trait]
impl BackendTransport for HttpClient {
    async fn fetch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<BackendResponse, TransportError> {
        let base = self.initialize().await?;

        match self.send_once(&base, endpoint, &options).await {
            Ok(response) => {
                tracing::debug!(
                    method = options.method.as_str(),
                    endpoint,
                    status = response.status,
                    "Backend request completed"
                );
                Ok(response)
            }
            Err(e @ TransportError::InvalidEndpoint { .. }) => Err(e),
            Err(e) => {
                tracing::warn!(
                    method = options.method.as_str(),
                    endpoint,
                    error = %e,
                    "Backend request failed, re-resolving address and retrying once"
                );
                self.reset().await;
                let base = self.initialize().await?;
                self.send_once(&base, endpoint, &options)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(
                            method = options.method.as_str(),
                            endpoint,
                            error = %e,
                            "Backend request failed after retry"
                        );
                    })
            }
        }
    }
}
