//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Reaching the backend (could swap reqwest -> a scripted fake)
//! - Finding the backend (fixed URL, port file written by the child process)
//! - Persisting user settings
//! - Native platform actions (install detection, launching the game)
//! - Clock (for testing)

mod error;
mod platform;
mod storage;
mod testing;
mod transport;

pub use error::{PlatformError, SettingsError, TransportError};
pub use platform::{InstallationInfo, PlatformBridge};
pub use storage::KeyValueStore;
pub use testing::ClockPort;
pub use transport::{
    BackendLocator, BackendResponse, BackendTransport, CacheMode, HttpMethod, RequestOptions,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use testing::MockClockPort;
#[cfg(test)]
pub use transport::{MockBackendLocator, MockBackendTransport};
