//! Typed backend command surface.

use async_trait::async_trait;

use crate::domain::{
    DiskSpace, DownloadRequest, DownloadTask, HistoryRecord, HistoryStats, QueueStats, TaskId,
};
use crate::errors::BackendResult;

/// One method per backend command.
///
/// Implementations are thin: no validation, no retry, no timeout. Every
/// method returns the backend's answer or its error unchanged.
#[async_trait]
pub trait DownloadCommandsPort: Send + Sync {
    /// Whether the backend is reachable.
    fn is_available(&self) -> bool;

    // ========== Task commands ==========

    /// Enqueue a download. Returns the backend-assigned id.
    async fn add_download(&self, request: &DownloadRequest) -> BackendResult<TaskId>;

    async fn get_download(&self, id: &TaskId) -> BackendResult<DownloadTask>;

    async fn list_downloads(&self) -> BackendResult<Vec<DownloadTask>>;

    async fn queue_stats(&self) -> BackendResult<QueueStats>;

    async fn pause_download(&self, id: &TaskId) -> BackendResult<()>;

    async fn resume_download(&self, id: &TaskId) -> BackendResult<()>;

    async fn cancel_download(&self, id: &TaskId) -> BackendResult<()>;

    /// Remove a task. Returns whether the backend knew the id.
    async fn remove_download(&self, id: &TaskId) -> BackendResult<bool>;

    // ========== Bulk commands ==========

    async fn pause_all(&self) -> BackendResult<u32>;

    async fn resume_all(&self) -> BackendResult<u32>;

    async fn cancel_all(&self) -> BackendResult<u32>;

    /// Drop every terminal task from the queue. Returns how many were removed.
    async fn clear_finished(&self) -> BackendResult<u32>;

    /// Re-queue every failed task. Returns how many were re-queued.
    async fn retry_failed(&self) -> BackendResult<u32>;

    // ========== Queue settings ==========

    /// Set the global speed limit in bytes per second (0 = unlimited).
    async fn set_speed_limit(&self, bytes_per_sec: u64) -> BackendResult<()>;

    async fn get_speed_limit(&self) -> BackendResult<u64>;

    async fn set_max_concurrent(&self, max: u32) -> BackendResult<()>;

    // ========== History ==========

    async fn history_list(&self, limit: u32) -> BackendResult<Vec<HistoryRecord>>;

    async fn history_search(&self, query: &str) -> BackendResult<Vec<HistoryRecord>>;

    async fn history_stats(&self) -> BackendResult<HistoryStats>;

    /// Clear history, optionally only records older than `days`.
    async fn history_clear(&self, days: Option<u32>) -> BackendResult<u32>;

    async fn history_remove(&self, id: &str) -> BackendResult<bool>;

    // ========== Disk ==========

    async fn disk_space(&self, path: &str) -> BackendResult<DiskSpace>;

    async fn check_disk_space(&self, path: &str, required_bytes: u64) -> BackendResult<bool>;
}
