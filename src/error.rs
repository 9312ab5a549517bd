//! Crate error types.
//!
//! Transport and server failures surface as [`ClientError`]; malformed
//! stream payloads deliberately do not appear here because they are
//! recovered locally by the parser (see `stream::parser`).

use thiserror::Error;

use crate::traits::HttpError;

/// Errors from the streaming news client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed (connection refused, timeout, mid-stream IO).
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// The server answered with a non-success status before streaming.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
