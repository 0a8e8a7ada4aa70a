//! Client error types.

use thiserror::Error;

/// Errors raised by the CLI client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The WebSocket connection failed or was lost.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// A prompt line could not be translated into a protocol message.
    #[error("{0}")]
    InvalidCommand(String),
}
