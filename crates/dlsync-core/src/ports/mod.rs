//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the client expects from infrastructure. They
//! contain no transport details and use only domain types.
//!
//! # Design Rules
//!
//! - `InvokePort` is the raw request/response boundary (command name + JSON)
//! - `DownloadCommandsPort` is the typed command surface built on top of it
//! - `EventSourcePort` hands out releasable subscriptions to named channels
//! - Repositories work with domain types and hide serialization

pub mod commands;
pub mod event_source;
pub mod invoke;
pub mod settings_repository;

use thiserror::Error;

pub use commands::DownloadCommandsPort;
pub use event_source::{EventHandler, EventSourcePort, Subscription};
pub use invoke::InvokePort;
pub use settings_repository::{InMemorySettingsRepository, SettingsRepository};

/// Domain-specific errors for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Storage backend error (filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failure to establish a subscription on a named channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to listen on '{channel}': {message}")]
pub struct ListenError {
    pub channel: String,
    pub message: String,
}

impl ListenError {
    pub fn new(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message: message.into(),
        }
    }
}
