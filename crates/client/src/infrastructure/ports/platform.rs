//! Native platform bridge.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use saveforge_shared::HealthResponse;

use super::PlatformError;

/// A located game installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationInfo {
    pub root: PathBuf,
    pub executable: PathBuf,
}

/// Native-process operations exposed to the editor.
///
/// File dialogs and window chrome belong to the shell and are not part of
/// this contract.
#[async_trait]
pub trait PlatformBridge: Send + Sync {
    /// Look for a game installation in the configured path, then well-known locations.
    async fn detect_installation(
        &self,
        configured: Option<&Path>,
    ) -> Result<InstallationInfo, PlatformError>;

    /// Start the game as a detached process.
    async fn launch_game(&self, installation: &InstallationInfo) -> Result<(), PlatformError>;

    /// Ask the backend child process whether it is up.
    async fn backend_health(&self) -> Result<HealthResponse, PlatformError>;
}
