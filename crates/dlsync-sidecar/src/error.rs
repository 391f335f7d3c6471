//! Sidecar lifecycle errors.
//!
//! Per-request failures are reported as `BackendError`; this type only
//! covers starting and stopping the child process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SidecarError {
    /// The backend executable could not be started.
    #[error("Failed to spawn backend '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child was spawned without one of its stdio pipes.
    #[error("Backend process has no {0} pipe")]
    MissingPipe(&'static str),

    /// Signalling the child failed.
    #[error("Failed to stop backend: {0}")]
    Shutdown(#[source] std::io::Error),
}
