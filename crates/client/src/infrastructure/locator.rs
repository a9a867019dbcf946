//! Backend address resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::BackendAddress;
use crate::infrastructure::ports::{BackendLocator, TransportError};

/// Always resolves to the same base URL.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    base_url: Url,
}

impl FixedLocator {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        Ok(Self::new(url_for_port(host, port)?))
    }
}

#[async_trait]
impl BackendLocator for FixedLocator {
    async fn resolve(&self) -> Result<Url, TransportError> {
        Ok(self.base_url.clone())
    }
}

/// Reads the port the backend child process publishes on startup.
///
/// The file is re-read on every resolution, so a backend restarted on a new
/// port is picked up the next time the HTTP client re-resolves.
#[derive(Debug, Clone)]
pub struct PortFileLocator {
    path: PathBuf,
    host: String,
}

impl PortFileLocator {
    pub fn new(path: impl Into<PathBuf>, host: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            host: host.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BackendLocator for PortFileLocator {
    async fn resolve(&self) -> Result<Url, TransportError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TransportError::unresolved(format!("reading {}: {}", self.path.display(), e))
        })?;
        let port: u16 = raw.trim().parse().map_err(|_| {
            TransportError::unresolved(format!(
                "{} does not contain a port number",
                self.path.display()
            ))
        })?;
        tracing::debug!(port, path = %self.path.display(), "Resolved backend port from file");
        url_for_port(&self.host, port)
    }
}

fn url_for_port(host: &str, port: u16) -> Result<Url, TransportError> {
    Url::parse(&format!("http://{}:{}", host, port)).map_err(TransportError::unresolved)
}

/// Build the locator described by configuration.
pub fn locator_for(address: &BackendAddress) -> Result<Arc<dyn BackendLocator>, TransportError> {
    Ok(match address {
        BackendAddress::Fixed(url) => Arc::new(FixedLocator::new(url.clone())),
        BackendAddress::Port { host, port } => Arc::new(FixedLocator::from_host_port(host, *port)?),
        BackendAddress::PortFile { path, host } => {
            Arc::new(PortFileLocator::new(path.clone(), host.clone()))
        }
    })
}
