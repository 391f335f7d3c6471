//! Backend error type.
//!
//! Serializable and free of transport-specific error types so it can cross
//! any adapter boundary (CLI, sidecar, in-process).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by any backend round trip.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackendError {
    /// The backend reported a failure. The message is kept verbatim.
    #[error("{message}")]
    Rejected {
        /// Message as sent by the backend.
        message: String,
    },

    /// The backend could not be reached or the channel broke mid-call.
    #[error("Transport error: {message}")]
    Transport {
        /// Detailed error message.
        message: String,
    },

    /// The backend answered with a payload of the wrong shape.
    #[error("Failed to decode response to '{command}': {message}")]
    Decode {
        /// Command whose response failed to decode.
        command: String,
        /// Decoder message.
        message: String,
    },
}

impl BackendError {
    /// Create a rejection carrying the backend's message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error for `command`.
    pub fn decode(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Whether the backend itself refused the request.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result alias for backend round trips.
pub type BackendResult<T> = Result<T, BackendError>;
