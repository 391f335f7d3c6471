//! Core domain for the dlsync download queue client.
//!
//! This crate holds everything the client needs that does not touch a
//! transport: task and history types, the backend event union, the
//! reactive [`DownloadStore`], the process-wide activity registry, and the
//! port traits adapters implement.
//!
//! # Structure
//!
//! - `domain` - Tasks, progress, queue stats, history records, disk space
//! - `events` - Backend push events and their wire channel names
//! - `errors` - Backend error type shared by every port
//! - `ports` - Trait abstractions for the backend, event source and settings storage
//! - `settings` - The client-persisted settings
//! - `store` - Task/history store with change notification
//! - `registry` - Process-wide activity flags keyed by source id
//! - `utils` - Human-readable formatting helpers

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod registry;
pub mod settings;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{
    DiskSpace, DownloadRequest, DownloadTask, HistoryRecord, HistoryStats, QueueStats, TaskId,
    TaskPatch, TaskProgress, TaskState,
};
pub use errors::{BackendError, BackendResult};
pub use events::{BackendEvent, EventKind};
pub use ports::{
    DownloadCommandsPort, EventHandler, EventSourcePort, InMemorySettingsRepository, InvokePort,
    ListenError, RepositoryError, SettingsRepository, Subscription,
};
pub use settings::ClientSettings;
pub use store::{DownloadStore, HISTORY_LIMIT, StoreState};
