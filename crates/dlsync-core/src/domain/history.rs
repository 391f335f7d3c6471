//! Download history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{TaskId, TaskState};

/// Immutable record of a finished download.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub task_id: TaskId,
    pub url: String,
    pub destination: String,
    pub name: String,
    /// Terminal state the task finished in.
    pub status: TaskState,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Wall-clock time from start to finish.
    #[serde(default)]
    pub duration_secs: u64,
    /// Mean transfer rate in bytes per second.
    #[serde(default)]
    pub average_speed: f64,
}

/// Aggregates over the whole history table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryStats {
    pub total_count: u32,
    pub completed_count: u32,
    pub failed_count: u32,
    pub cancelled_count: u32,
    pub total_bytes: u64,
    pub average_speed: f64,
}
