//! Aggregate queue statistics.

use serde::{Deserialize, Serialize};

/// Queue-wide counters reported by the backend.
///
/// Owned by the backend. The client replaces this wholesale on every
/// `download-queue-updated` event and never derives it from the task list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueStats {
    pub total_tasks: u32,
    pub queued: u32,
    pub downloading: u32,
    pub paused: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    /// Sum of known content lengths.
    pub total_bytes: u64,
    pub downloaded_bytes: u64,
    /// Overall completion percentage (0.0 - 100.0).
    pub overall_progress: f64,
    /// Combined transfer rate in bytes per second.
    pub total_speed: f64,
}
