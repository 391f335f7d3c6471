//! Domain types mirrored from the download backend.
//!
//! These types are pure data and have no transport dependencies.

mod disk;
mod history;
mod request;
mod stats;
mod task;

pub use disk::DiskSpace;
pub use history::{HistoryRecord, HistoryStats};
pub use request::DownloadRequest;
pub use stats::QueueStats;
pub use task::{DownloadTask, TaskId, TaskPatch, TaskProgress, TaskState};
