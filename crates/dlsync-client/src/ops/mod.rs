//! Action handlers behind `DownloadQueueClient`.
//!
//! Each handler borrows what it needs from the client for the duration of
//! one call. Every action checks backend availability first.

mod disk;
mod downloads;
mod history;
mod settings;

pub use disk::DiskOps;
pub use downloads::DownloadOps;
pub use history::HistoryOps;
pub use settings::SettingsOps;
