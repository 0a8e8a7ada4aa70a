//! Request handlers.

mod http;
mod websocket;

pub use http::{get_devices, health_check, post_command};
pub use websocket::websocket_handler;
