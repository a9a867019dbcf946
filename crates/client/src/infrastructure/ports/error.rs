//! Error types for port operations.

/// Transport-level failures: the request never produced an HTTP response.
///
/// HTTP error statuses are not transport errors; they come back as ordinary
/// [`BackendResponse`](super::BackendResponse)s.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The backend address could not be determined.
    #[error("Backend address unavailable: {0}")]
    Unresolved(String),

    /// Endpoint could not be joined onto the base address.
    #[error("Invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Connection refused/reset or the body could not be read.
    #[error("Connection to backend failed: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("Request to backend timed out")]
    Timeout,
}

impl TransportError {
    pub fn unresolved(message: impl ToString) -> Self {
        Self::Unresolved(message.to_string())
    }

    pub fn connection(message: impl ToString) -> Self {
        Self::Connection(message.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(e.to_string())
        }
    }
}

/// Settings persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Native platform action errors.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("No game installation configured or detected")]
    InstallationNotFound,

    #[error("Game executable not found at {0}")]
    ExecutableMissing(String),

    #[error("Failed to launch game: {0}")]
    Launch(#[from] std::io::Error),

    #[error("Backend health check failed: {0}")]
    Health(String),
}
