//! Typed command adapter over the raw invoke boundary.
//!
//! One method per backend command. Arguments are sent as camelCase JSON
//! objects; results are decoded into domain types. Nothing is validated
//! client-side and nothing is retried: the backend's answer, or its error,
//! comes back unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use dlsync_core::ports::{DownloadCommandsPort, InvokePort};
use dlsync_core::{
    BackendError, BackendResult, DiskSpace, DownloadRequest, DownloadTask, HistoryRecord,
    HistoryStats, QueueStats, TaskId,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::trace;

/// Wire-stable backend command names.
pub mod names {
    pub const ADD: &str = "download_add";
    pub const GET: &str = "download_get";
    pub const LIST: &str = "download_list";
    pub const STATS: &str = "download_stats";
    pub const PAUSE: &str = "download_pause";
    pub const RESUME: &str = "download_resume";
    pub const CANCEL: &str = "download_cancel";
    pub const REMOVE: &str = "download_remove";
    pub const PAUSE_ALL: &str = "download_pause_all";
    pub const RESUME_ALL: &str = "download_resume_all";
    pub const CANCEL_ALL: &str = "download_cancel_all";
    pub const CLEAR_FINISHED: &str = "download_clear_finished";
    pub const RETRY_FAILED: &str = "download_retry_failed";
    pub const SET_SPEED_LIMIT: &str = "download_set_speed_limit";
    pub const GET_SPEED_LIMIT: &str = "download_get_speed_limit";
    pub const SET_MAX_CONCURRENT: &str = "download_set_max_concurrent";
    pub const HISTORY_LIST: &str = "download_history_list";
    pub const HISTORY_SEARCH: &str = "download_history_search";
    pub const HISTORY_STATS: &str = "download_history_stats";
    pub const HISTORY_CLEAR: &str = "download_history_clear";
    pub const HISTORY_REMOVE: &str = "download_history_remove";
    pub const DISK_SPACE_GET: &str = "disk_space_get";
    pub const DISK_SPACE_CHECK: &str = "disk_space_check";
}

/// [`DownloadCommandsPort`] implementation that forwards to an [`InvokePort`].
#[derive(Clone)]
pub struct CommandAdapter {
    invoker: Arc<dyn InvokePort>,
}

impl CommandAdapter {
    pub fn new(invoker: Arc<dyn InvokePort>) -> Self {
        Self { invoker }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        command: &'static str,
        args: Value,
    ) -> BackendResult<T> {
        trace!(command, "Invoking backend command");
        let value = self.invoker.invoke(command, args).await?;
        serde_json::from_value(value).map_err(|e| BackendError::decode(command, e.to_string()))
    }

    /// Invoke a command whose result carries no information.
    async fn call_unit(&self, command: &'static str, args: Value) -> BackendResult<()> {
        trace!(command, "Invoking backend command");
        self.invoker.invoke(command, args).await.map(|_| ())
    }
}

#[async_trait]
impl DownloadCommandsPort for CommandAdapter {
    fn is_available(&self) -> bool {
        self.invoker.is_available()
    }

    async fn add_download(&self, request: &DownloadRequest) -> BackendResult<TaskId> {
        self.call(names::ADD, json!({ "request": request })).await
    }

    async fn get_download(&self, id: &TaskId) -> BackendResult<DownloadTask> {
        self.call(names::GET, json!({ "id": id })).await
    }

    async fn list_downloads(&self) -> BackendResult<Vec<DownloadTask>> {
        self.call(names::LIST, json!({})).await
    }

    async fn queue_stats(&self) -> BackendResult<QueueStats> {
        self.call(names::STATS, json!({})).await
    }

    async fn pause_download(&self, id: &TaskId) -> BackendResult<()> {
        self.call_unit(names::PAUSE, json!({ "id": id })).await
    }

    async fn resume_download(&self, id: &TaskId) -> BackendResult<()> {
        self.call_unit(names::RESUME, json!({ "id": id })).await
    }

    async fn cancel_download(&self, id: &TaskId) -> BackendResult<()> {
        self.call_unit(names::CANCEL, json!({ "id": id })).await
    }

    async fn remove_download(&self, id: &TaskId) -> BackendResult<bool> {
        self.call(names::REMOVE, json!({ "id": id })).await
    }

    async fn pause_all(&self) -> BackendResult<u32> {
        self.call(names::PAUSE_ALL, json!({})).await
    }

    async fn resume_all(&self) -> BackendResult<u32> {
        self.call(names::RESUME_ALL, json!({})).await
    }

    async fn cancel_all(&self) -> BackendResult<u32> {
        self.call(names::CANCEL_ALL, json!({})).await
    }

    async fn clear_finished(&self) -> BackendResult<u32> {
        self.call(names::CLEAR_FINISHED, json!({})).await
    }

    async fn retry_failed(&self) -> BackendResult<u32> {
        self.call(names::RETRY_FAILED, json!({})).await
    }

    async fn set_speed_limit(&self, bytes_per_sec: u64) -> BackendResult<()> {
        self.call_unit(
            names::SET_SPEED_LIMIT,
            json!({ "bytesPerSec": bytes_per_sec }),
        )
        .await
    }

    async fn get_speed_limit(&self) -> BackendResult<u64> {
        self.call(names::GET_SPEED_LIMIT, json!({})).await
    }

    async fn set_max_concurrent(&self, max: u32) -> BackendResult<()> {
        self.call_unit(names::SET_MAX_CONCURRENT, json!({ "max": max }))
            .await
    }

    async fn history_list(&self, limit: u32) -> BackendResult<Vec<HistoryRecord>> {
        self.call(names::HISTORY_LIST, json!({ "limit": limit }))
            .await
    }

    async fn history_search(&self, query: &str) -> BackendResult<Vec<HistoryRecord>> {
        self.call(names::HISTORY_SEARCH, json!({ "query": query }))
            .await
    }

    async fn history_stats(&self) -> BackendResult<HistoryStats> {
        self.call(names::HISTORY_STATS, json!({})).await
    }

    async fn history_clear(&self, days: Option<u32>) -> BackendResult<u32> {
        self.call(names::HISTORY_CLEAR, json!({ "days": days }))
            .await
    }

    async fn history_remove(&self, id: &str) -> BackendResult<bool> {
        self.call(names::HISTORY_REMOVE, json!({ "id": id })).await
    }

    async fn disk_space(&self, path: &str) -> BackendResult<DiskSpace> {
        self.call(names::DISK_SPACE_GET, json!({ "path": path }))
            .await
    }

    async fn check_disk_space(&self, path: &str, required_bytes: u64) -> BackendResult<bool> {
        self.call(
            names::DISK_SPACE_CHECK,
            json!({ "path": path, "requiredBytes": required_bytes }),
        )
        .await
    }
}
