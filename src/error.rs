//! Error taxonomy shared by the transport, gateway, and dispatch layers.

use thiserror::Error;

/// Convenient result alias returning [`ClientError`] failures.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by the display client.
///
/// None of these are fatal once the client is running: the sync loop and the
/// command dispatcher fold them into the user-visible error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Network failure or non-2xx response from the remote authority.
    #[error("{message}")]
    Transport {
        /// HTTP status when a response was received, `None` for network-level failures.
        status: Option<u16>,
        /// Human-readable description, including the response body when available.
        message: String,
    },
    /// A local call was malformed (e.g. an unknown team code).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The client could not be configured (bad base address, TLS setup).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build a transport failure for a request that never produced a response.
    pub fn network(source: &reqwest::Error) -> Self {
        ClientError::Transport {
            status: source.status().map(|status| status.as_u16()),
            message: source.to_string(),
        }
    }

    /// Build a transport failure from an HTTP status and the (possibly empty) response body.
    pub fn http_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {reason}: {body}", status.as_u16()),
            None => format!("HTTP {}: {body}", status.as_u16()),
        };
        ClientError::Transport {
            status: Some(status.as_u16()),
            message,
        }
    }

    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
