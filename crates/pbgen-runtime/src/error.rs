//! Errors returned by [`Service`](crate::Service) calls.

use thiserror::Error;

use crate::transport::TransportError;

/// A failed service call. Nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The transport reported a failure.
    #[error("request failed with status {status}: {message}")]
    Transport { status: u16, message: String },

    /// A single-record lookup came back 404.
    #[error("record '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: String },

    /// The response did not have the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// The cancellation token fired between requests.
    #[error("operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Remote status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport { status, .. } => Some(*status),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Decode { .. } | ClientError::Cancelled => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport {
            status: err.status,
            message: err.message,
        }
    }
}
