//! Shared library for the irori device-control hub.
//!
//! Logging setup and time utilities used by both the server and the
//! client binaries.

pub mod logger;
pub mod time;
