//! Client error type.

use dlsync_core::{BackendError, RepositoryError};
use thiserror::Error;

/// Errors returned by [`DownloadQueueClient`](crate::DownloadQueueClient) actions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The native backend is not present in this environment.
    #[error("Download backend unavailable: cannot {action}")]
    Unavailable {
        /// Action that was attempted.
        action: &'static str,
    },

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Settings could not be loaded or stored.
    #[error(transparent)]
    Settings(#[from] RepositoryError),
}

impl ClientError {
    #[must_use]
    pub const fn unavailable(action: &'static str) -> Self {
        Self::Unavailable { action }
    }
}

/// Result alias for client actions.
pub type ClientResult<T> = Result<T, ClientError>;
