//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to establish or keep the connection to the relay
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Relay URL or origin could not be turned into a WebSocket request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Message could not be encoded as a frame
    #[error("Failed to encode message: {0}")]
    Encode(String),

    /// The session's connection is already closed
    #[error("Session is closed")]
    SessionClosed,
}
