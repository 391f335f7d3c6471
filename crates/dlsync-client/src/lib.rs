//! Download queue client for dlsync.
//!
//! This crate keeps a local [`DownloadStore`] in sync with a native
//! download backend. Commands go out through the [`CommandAdapter`]; pushed
//! events come back through the [`EventBridge`]; [`DownloadQueueClient`]
//! composes the two and exposes the action surface a UI binds to.
//!
//! # Architecture
//!
//! ```text
//! Caller:            DownloadQueueClient
//!                     ↓               ↑ (store reads)
//! Facade:      ops::* ──→ CommandAdapter ──→ InvokePort ──→ backend
//!                                                             │
//! Events:      DownloadStore ←── EventBridge ←── EventSourcePort
//! ```
//!
//! # Rules
//!
//! 1. **No transport dependencies** - adapters arrive as port trait objects via `ClientDeps`
//! 2. **Backend is authoritative** - no client-side validation, no local task fabrication
//! 3. **Reads degrade, writes propagate** - refresh failures are logged, mutations return errors

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Only the integration test fixtures build timestamps
#[cfg(test)]
use chrono as _;

mod adapter;
mod bridge;
mod client;
mod deps;
mod error;
mod hub;
mod ops;
mod settings_file;
mod sync;

// Primary exports
pub use adapter::{CommandAdapter, names};
pub use bridge::EventBridge;
pub use client::DownloadQueueClient;
pub use deps::ClientDeps;
pub use error::{ClientError, ClientResult};
pub use hub::LocalEventHub;
pub use settings_file::JsonSettingsRepository;
pub use sync::QueueSync;

// Re-export operation modules for direct access if needed
pub use ops::{DiskOps, DownloadOps, HistoryOps, SettingsOps};

// Re-export commonly used types from dlsync-core for convenience
pub use dlsync_core::{DownloadRequest, DownloadStore, DownloadTask, TaskId, TaskState};
