//! Client configuration loaded from the environment.
//!
//! The desktop shell writes these into `.env` (or exports them) before
//! spawning the editor; everything has a default so a bare run works against a
//! backend on the default port.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_BACKEND_PORT: u16 = 8000;
pub const DEFAULT_API_PREFIX: &str = "/api";
/// Default request timeout in milliseconds (2 minutes)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;
/// Host used when the backend only publishes a port.
pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";

pub const ENV_BACKEND_URL: &str = "SAVEFORGE_BACKEND_URL";
pub const ENV_BACKEND_PORT_FILE: &str = "SAVEFORGE_BACKEND_PORT_FILE";
pub const ENV_API_PREFIX: &str = "SAVEFORGE_API_PREFIX";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SAVEFORGE_REQUEST_TIMEOUT_MS";
pub const ENV_SETTINGS_PATH: &str = "SAVEFORGE_SETTINGS_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {message}")]
    InvalidUrl { var: &'static str, message: String },

    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Where to find the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendAddress {
    /// A fixed base URL.
    Fixed(Url),
    /// A fixed host and port over plain HTTP.
    Port { host: String, port: u16 },
    /// A file the backend child process writes its listening port into.
    PortFile { path: PathBuf, host: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend: BackendAddress,
    /// Path prefix of every API endpoint (e.g. `/api`).
    pub api_prefix: String,
    /// `None` disables the request timeout.
    pub request_timeout: Option<Duration>,
    /// Override for the settings file location.
    pub settings_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendAddress::Port {
                host: DEFAULT_BACKEND_HOST.to_string(),
                port: DEFAULT_BACKEND_PORT,
            },
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
            settings_path: None,
        }
    }
}

impl ClientConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // A port file wins over a fixed URL: it tracks backend restarts.
        if let Some(path) = non_empty(lookup(ENV_BACKEND_PORT_FILE)) {
            config.backend = BackendAddress::PortFile {
                path: PathBuf::from(path),
                host: DEFAULT_BACKEND_HOST.to_string(),
            };
        } else if let Some(raw) = non_empty(lookup(ENV_BACKEND_URL)) {
            let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                var: ENV_BACKEND_URL,
                message: e.to_string(),
            })?;
            config.backend = BackendAddress::Fixed(url);
        }

        if let Some(prefix) = lookup(ENV_API_PREFIX) {
            config.api_prefix = normalize_prefix(&prefix);
        }

        if let Some(raw) = non_empty(lookup(ENV_REQUEST_TIMEOUT_MS)) {
            let ms: u64 = raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: ENV_REQUEST_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            config.request_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        config.settings_path = non_empty(lookup(ENV_SETTINGS_PATH)).map(PathBuf::from);

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `"api/"` -> `"/api"`, `""` -> `""`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
