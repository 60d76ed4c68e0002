//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Another live connection holds the name in this room
    #[error("Player name '{0}' is already taken in this room")]
    NameTaken(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
