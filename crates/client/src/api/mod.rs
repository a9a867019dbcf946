//! Typed API wrapper and per-area API modules.
//!
//! `Api` wraps an `Arc<dyn BackendTransport>` and provides typed helpers via
//! serde_json conversions. The transport returns HTTP error statuses as
//! ordinary responses; this layer turns them into [`ApiError::Server`] carrying
//! the server-provided message.

pub mod alignment;
pub mod attributes;
pub mod feats;
pub mod inventory;
pub mod session;
pub mod skills;
pub mod subsystems;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use saveforge_shared::{ErrorBody, MutationOutcome};

use crate::infrastructure::ports::{BackendTransport, CacheMode, RequestOptions, TransportError};

pub use alignment::AlignmentApi;
pub use attributes::AttributesApi;
pub use feats::FeatsApi;
pub use inventory::InventoryApi;
pub use session::SessionApi;
pub use skills::SkillsApi;
pub use subsystems::SubsystemSource;

/// Errors surfaced by API calls
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Backend answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Backend answered 2xx but reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response data
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Failed to serialize request body
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Message suitable for a toast or inline error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } | Self::Rejected(message) => message.clone(),
            Self::Transport(_) => "Could not reach the editor backend".to_string(),
            Self::Parse(_) | Self::Serialize(_) => {
                "Unexpected data from the editor backend".to_string()
            }
        }
    }
}

#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn BackendTransport>,
}

impl Api {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    pub fn attributes(&self) -> AttributesApi {
        AttributesApi::new(self.clone())
    }

    pub fn skills(&self) -> SkillsApi {
        SkillsApi::new(self.clone())
    }

    pub fn feats(&self) -> FeatsApi {
        FeatsApi::new(self.clone())
    }

    pub fn inventory(&self) -> InventoryApi {
        InventoryApi::new(self.clone())
    }

    pub fn alignment(&self) -> AlignmentApi {
        AlignmentApi::new(self.clone())
    }

    pub fn session(&self) -> SessionApi {
        SessionApi::new(self.clone())
    }

    /// GET returning the raw JSON body.
    pub async fn get_value(&self, path: &str, cache: CacheMode) -> Result<Value, ApiError> {
        self.send(path, RequestOptions::get().with_cache(cache)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get_value(path, CacheMode::Default).await?;
        decode(value)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body_value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialize(e.to_string()))?;
        let value = self.send(path, RequestOptions::post(body_value)).await?;
        decode(value)
    }

    /// POST a mutation and fail with [`ApiError::Rejected`] on `success: false`.
    pub async fn mutate<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + MutationOutcome,
        B: Serialize + Sync,
    {
        let response: T = self.post(path, body).await?;
        ensure_succeeded(response)
    }

    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(path, RequestOptions::post_empty()).await.map(|_| ())
    }

    async fn send(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let response = self.transport.fetch(path, options).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            let message = server_message(response.status, &response.body);
            tracing::debug!(path, status = response.status, %message, "Backend returned error status");
            Err(ApiError::Server {
                status: response.status,
                message,
            })
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

fn ensure_succeeded<T: MutationOutcome>(response: T) -> Result<T, ApiError> {
    if response.succeeded() {
        Ok(response)
    } else {
        Err(ApiError::Rejected(
            response
                .message()
                .unwrap_or("The backend rejected the change")
                .to_string(),
        ))
    }
}

fn server_message(status: u16, body: &Value) -> String {
    let message = match body {
        Value::Object(_) => serde_json::from_value::<ErrorBody>(body.clone())
            .ok()
            .and_then(|b| b.server_message().map(str::to_string)),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    };
    message.unwrap_or_else(|| format!("HTTP {}", status))
}
