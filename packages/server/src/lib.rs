//! irori device-control hub server library.
//!
//! Routes typed control messages (light/fan/AC, status reports, voice
//! shorthand) between WebSocket connections, keeps the authoritative
//! in-memory device registry, and broadcasts every accepted change to all
//! connected parties.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
