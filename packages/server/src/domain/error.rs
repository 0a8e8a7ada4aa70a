//! Domain-level error types.

use thiserror::Error;

/// Errors raised by domain value objects and entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Device id was empty (or whitespace-only) after trimming.
    #[error("device id is empty")]
    EmptyDeviceId,

    /// The registry refused to grow past its configured capacity.
    #[error("device registry is full (capacity: {0})")]
    RegistryFull(usize),
}

/// Errors raised by repository implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The underlying registry refused the insert.
    #[error("device registry is full (capacity: {0})")]
    CapacityExceeded(usize),
}

/// Errors raised when pushing messages to connections.
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// The target connection is not registered.
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    /// The transport channel rejected the message.
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
