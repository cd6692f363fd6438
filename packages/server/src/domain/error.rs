//! Domain error types.

use thiserror::Error;

/// Errors constructing a [`super::UserId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    /// The identity was empty after trimming
    #[error("user id must not be empty")]
    Empty,
}

/// Errors pushing a message to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection is not registered with the pusher
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    /// The underlying channel rejected the message
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
