//! # Client Errors
//!
//! Error taxonomy for the query pipeline. Everything here is a runtime
//! condition surfaced to the caller; programming errors (double latch
//! completion, empty combinator arities) panic instead.

use std::time::Duration;

use thiserror::Error;

use crate::values::DecodeError;

use super::response::QueryError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the query pipeline.
///
/// `Clone` so a result can sit in a latch and be observed more than
/// once; transport failures carry their message rather than the
/// underlying `reqwest::Error`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Invalid client configuration (bad endpoint URL)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport failure: connectivity, TLS, transport-level timeout
    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The response body could not be parsed at all
    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    /// The response parsed, but a value inside it did not decode
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A well-formed server error response
    #[error("Server returned status {status}")]
    Server {
        status: u16,
        errors: Vec<QueryError>,
    },

    /// The request was cancelled before completion
    #[error("Query was cancelled")]
    Cancelled,

    /// The synchronous bridge's deadline elapsed
    #[error("Timed out after {0:?} waiting for completion")]
    Timeout(Duration),
}

impl ClientError {
    /// True when retrying the same request could plausibly succeed.
    ///
    /// The pipeline never retries on its own; this only informs
    /// caller-driven retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Timeout(_) => true,
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport {
            message: e.to_string(),
            timed_out: e.is_timeout(),
        }
    }
}
