//! Backend transport boundary.
//!
//! `BackendTransport` is object-safe so the composition root can hold an
//! `Arc<dyn BackendTransport>`; typed request/response handling lives one
//! layer up in [`crate::api::Api`].

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::TransportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Caching behaviour requested by the caller.
///
/// Normalized into `Cache-Control`/`Pragma` headers by the HTTP client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Default,
    /// Never store the response (`Cache-Control: no-store`).
    NoStore,
    /// Revalidate with the origin (`Cache-Control: no-cache`, `Pragma: no-cache`).
    Reload,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub cache: CacheMode,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            cache: CacheMode::NoStore,
        }
    }

    pub fn post_empty() -> Self {
        Self {
            method: HttpMethod::Post,
            body: None,
            cache: CacheMode::NoStore,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: HttpMethod::Delete,
            body: None,
            cache: CacheMode::NoStore,
        }
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }
}

/// An HTTP response of any status.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    /// Parsed JSON body. Non-JSON bodies are carried as a string, empty bodies as null.
    pub body: Value,
}

impl BackendResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse a raw body: JSON if possible, otherwise the text itself.
    pub fn parse_body(bytes: &[u8]) -> Value {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }
}

/// Performs requests against the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// Send `options` to `endpoint` (relative to the API base path).
    ///
    /// Returns `Err` only for transport failures; HTTP error statuses are `Ok`.
    async fn fetch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<BackendResponse, TransportError>;
}

/// Resolves the backend's current base address.
///
/// The backend is launched as a child process on a dynamic port, so the
/// address may change between resolutions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendLocator: Send + Sync {
    async fn resolve(&self) -> Result<Url, TransportError>;
}
