//! Desktop implementation of the platform bridge.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use directories::BaseDirs;
use saveforge_shared::HealthResponse;

use crate::api::{Api, SessionApi};
use crate::infrastructure::ports::{InstallationInfo, PlatformBridge, PlatformError};

/// Executable names looked for under an installation root, in order.
pub const GAME_EXECUTABLES: &[&str] = &["nwn2main.exe", "nwn2.exe", "nwn2main"];

const INSTALL_DIR_NAME: &str = "Neverwinter Nights 2";

pub struct DesktopPlatform {
    session: SessionApi,
    candidates: Vec<PathBuf>,
}

impl DesktopPlatform {
    pub fn new(api: &Api) -> Self {
        Self {
            session: api.session(),
            candidates: default_install_dirs(),
        }
    }

    /// Replace the well-known locations searched when no path is configured.
    pub fn with_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.candidates = candidates;
        self
    }
}

fn default_install_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = [
        r"C:\Program Files (x86)\Steam\steamapps\common",
        r"C:\Program Files\Steam\steamapps\common",
        r"C:\GOG Games",
        r"C:\Program Files (x86)\GOG Galaxy\Games",
        r"C:\Program Files (x86)\Atari",
    ]
    .iter()
    .map(|base| Path::new(base).join(INSTALL_DIR_NAME))
    .collect();

    if let Some(base) = BaseDirs::new() {
        let home = base.home_dir();
        dirs.push(home.join(".steam/steam/steamapps/common").join(INSTALL_DIR_NAME));
        dirs.push(home.join(".local/share/Steam/steamapps/common").join(INSTALL_DIR_NAME));
    }
    dirs
}

async fn find_executable(root: &Path) -> Option<PathBuf> {
    for name in GAME_EXECUTABLES {
        let candidate = root.join(name);
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Some(candidate);
        }
    }
    None
}

#[async_trait]
impl PlatformBridge for DesktopPlatform {
    async fn detect_installation(
        &self,
        configured: Option<&Path>,
    ) -> Result<InstallationInfo, PlatformError> {
        if let Some(root) = configured {
            return match find_executable(root).await {
                Some(executable) => Ok(InstallationInfo {
                    root: root.to_path_buf(),
                    executable,
                }),
                None => Err(PlatformError::ExecutableMissing(root.display().to_string())),
            };
        }

        for root in &self.candidates {
            if let Some(executable) = find_executable(root).await {
                tracing::info!(root = %root.display(), "Detected game installation");
                return Ok(InstallationInfo {
                    root: root.clone(),
                    executable,
                });
            }
        }
        Err(PlatformError::InstallationNotFound)
    }

    async fn launch_game(&self, installation: &InstallationInfo) -> Result<(), PlatformError> {
        if !tokio::fs::try_exists(&installation.executable)
            .await
            .unwrap_or(false)
        {
            return Err(PlatformError::ExecutableMissing(
                installation.executable.display().to_string(),
            ));
        }

        let child = tokio::process::Command::new(&installation.executable)
            .current_dir(&installation.root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::info!(
            executable = %installation.executable.display(),
            pid = child.id(),
            "Game launched"
        );
        Ok(())
    }

    async fn backend_health(&self) -> Result<HealthResponse, PlatformError> {
        let health = self
            .session
            .health()
            .await
            .map_err(|e| PlatformError::Health(e.to_string()))?;
        if health.is_healthy() {
            Ok(health)
        } else {
            Err(PlatformError::Health(format!(
                "backend reported status {}",
                health.status
            )))
        }
    }
}
