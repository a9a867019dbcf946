//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod http;
pub mod locator;
pub mod platform;
pub mod ports;
pub mod storage;
