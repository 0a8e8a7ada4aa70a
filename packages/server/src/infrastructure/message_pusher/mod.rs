//! MessagePusher implementations.

mod websocket;

pub use websocket::{ConnectionEntry, WebSocketMessagePusher};
