//! saveforge client.
//!
//! Character-data synchronization for the save editor: an HTTP client for the
//! local backend process, a per-character cache of subsystems, and editors
//! that apply changes optimistically and roll them back on failure.

pub mod api;
pub mod app;
pub mod config;
pub mod editors;
pub mod infrastructure;
pub mod notifications;
pub mod settings;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app::App;
pub use config::ClientConfig;
