//! Agent-side error types
//!
//! Remote failures always carry the platform's `code`/`message` pair;
//! nothing is swallowed. A zero-result search is not an error.

use a2e_core::ProtocolError;

/// Errors an agent can hit talking to the platform.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The platform returned a non-zero envelope code or a non-2xx status.
    #[error("A2E error [{code}]: {message}")]
    Remote { code: String, message: String },

    /// The request never completed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body was not the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The fetched protocol document is self-inconsistent.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}
