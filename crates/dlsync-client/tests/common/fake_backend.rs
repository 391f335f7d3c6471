//! In-memory stand-in for the native download backend.
//!
//! Keeps a task table and history table, records every command by its wire
//! name and never emits events on its own; tests publish events through the
//! hub to simulate the backend's push channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use dlsync_client::names;
use dlsync_core::ports::DownloadCommandsPort;
use dlsync_core::{
    BackendError, BackendResult, DiskSpace, DownloadRequest, DownloadTask, HistoryRecord,
    HistoryStats, QueueStats, TaskId, TaskState,
};

pub const DISK_AVAILABLE: u64 = 400;

#[derive(Default)]
pub struct FakeState {
    pub tasks: Vec<DownloadTask>,
    pub stats: QueueStats,
    pub history: Vec<HistoryRecord>,
    pub history_stats: HistoryStats,
    pub speed_limit: u64,
    pub max_concurrent: u32,
    pub calls: Vec<String>,
    pub fail_with: Option<String>,
    pub rejected_ids: Vec<TaskId>,
    next_id: u32,
}

pub struct FakeCommands {
    available: AtomicBool,
    state: Mutex<FakeState>,
}

impl Default for FakeCommands {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCommands {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            state: Mutex::new(FakeState {
                max_concurrent: 3,
                ..FakeState::default()
            }),
        }
    }

    /// A backend that reports itself absent.
    pub fn unavailable() -> Self {
        let fake = Self::new();
        fake.set_available(false);
        fake
    }

    pub fn with_tasks(tasks: Vec<DownloadTask>) -> Self {
        let fake = Self::new();
        fake.state().tasks = tasks;
        fake
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Every command received so far, by wire name.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.state().calls.iter().filter(|c| *c == command).count()
    }

    /// Make every subsequent command fail with `message`.
    pub fn fail_all(&self, message: &str) {
        self.state().fail_with = Some(message.to_string());
    }

    pub fn push_history(&self, record: HistoryRecord) {
        self.state().history.push(record);
    }

    /// Make per-id commands fail for `id`.
    pub fn reject_id(&self, id: &str) {
        self.state().rejected_ids.push(TaskId::from(id));
    }

    /// Backend-side state change, as the engine would do before emitting.
    pub fn set_task_state(&self, id: &str, state: TaskState) {
        if let Some(task) = self.state().tasks.iter_mut().find(|t| t.id.as_str() == id) {
            task.transition_to(state, chrono::Utc::now());
        }
    }

    fn record(&self, command: &str) -> BackendResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(command.to_string());
        if let Some(message) = state.fail_with.clone() {
            return Err(BackendError::rejected(message));
        }
        Ok(state)
    }

    fn record_for(&self, command: &str, id: &TaskId) -> BackendResult<MutexGuard<'_, FakeState>> {
        let state = self.record(command)?;
        if state.rejected_ids.contains(id) {
            return Err(BackendError::rejected(format!("Task not found: {id}")));
        }
        Ok(state)
    }

    fn count_in(&self, command: &str, states: &[TaskState]) -> BackendResult<u32> {
        let state = self.record(command)?;
        let count = state
            .tasks
            .iter()
            .filter(|t| states.contains(&t.state))
            .count();
        Ok(u32::try_from(count).unwrap())
    }
}

#[async_trait]
impl DownloadCommandsPort for FakeCommands {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn add_download(&self, request: &DownloadRequest) -> BackendResult<TaskId> {
        let mut state = self.record(names::ADD)?;
        state.next_id += 1;
        let id = TaskId::new(format!("task-{}", state.next_id));
        let name = request.name.clone().unwrap_or_else(|| {
            request
                .url
                .rsplit('/')
                .next()
                .unwrap_or("download")
                .to_string()
        });
        let task = DownloadTask::new(id.clone(), &request.url, &request.destination, name);
        state.tasks.insert(0, task);
        Ok(id)
    }

    async fn get_download(&self, id: &TaskId) -> BackendResult<DownloadTask> {
        let state = self.record_for(names::GET, id)?;
        state
            .tasks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| BackendError::rejected(format!("Task not found: {id}")))
    }

    async fn list_downloads(&self) -> BackendResult<Vec<DownloadTask>> {
        Ok(self.record(names::LIST)?.tasks.clone())
    }

    async fn queue_stats(&self) -> BackendResult<QueueStats> {
        Ok(self.record(names::STATS)?.stats.clone())
    }

    async fn pause_download(&self, id: &TaskId) -> BackendResult<()> {
        self.record_for(names::PAUSE, id).map(|_| ())
    }

    async fn resume_download(&self, id: &TaskId) -> BackendResult<()> {
        self.record_for(names::RESUME, id).map(|_| ())
    }

    async fn cancel_download(&self, id: &TaskId) -> BackendResult<()> {
        self.record_for(names::CANCEL, id).map(|_| ())
    }

    async fn remove_download(&self, id: &TaskId) -> BackendResult<bool> {
        let mut state = self.record_for(names::REMOVE, id)?;
        let before = state.tasks.len();
        state.tasks.retain(|t| &t.id != id);
        Ok(before != state.tasks.len())
    }

    async fn pause_all(&self) -> BackendResult<u32> {
        self.count_in(
            names::PAUSE_ALL,
            &[TaskState::Queued, TaskState::Downloading],
        )
    }

    async fn resume_all(&self) -> BackendResult<u32> {
        self.count_in(names::RESUME_ALL, &[TaskState::Paused])
    }

    async fn cancel_all(&self) -> BackendResult<u32> {
        self.count_in(
            names::CANCEL_ALL,
            &[TaskState::Queued, TaskState::Downloading, TaskState::Paused],
        )
    }

    async fn clear_finished(&self) -> BackendResult<u32> {
        let mut state = self.record(names::CLEAR_FINISHED)?;
        let before = state.tasks.len();
        state.tasks.retain(|t| !t.state.is_terminal());
        Ok(u32::try_from(before - state.tasks.len()).unwrap())
    }

    async fn retry_failed(&self) -> BackendResult<u32> {
        self.count_in(names::RETRY_FAILED, &[TaskState::Failed])
    }

    async fn set_speed_limit(&self, bytes_per_sec: u64) -> BackendResult<()> {
        self.record(names::SET_SPEED_LIMIT)?.speed_limit = bytes_per_sec;
        Ok(())
    }

    async fn get_speed_limit(&self) -> BackendResult<u64> {
        Ok(self.record(names::GET_SPEED_LIMIT)?.speed_limit)
    }

    async fn set_max_concurrent(&self, max: u32) -> BackendResult<()> {
        self.record(names::SET_MAX_CONCURRENT)?.max_concurrent = max;
        Ok(())
    }

    async fn history_list(&self, limit: u32) -> BackendResult<Vec<HistoryRecord>> {
        let state = self.record(names::HISTORY_LIST)?;
        Ok(state
            .history
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn history_search(&self, query: &str) -> BackendResult<Vec<HistoryRecord>> {
        let state = self.record(names::HISTORY_SEARCH)?;
        Ok(state
            .history
            .iter()
            .filter(|r| r.name.contains(query) || r.url.contains(query))
            .cloned()
            .collect())
    }

    async fn history_stats(&self) -> BackendResult<HistoryStats> {
        Ok(self.record(names::HISTORY_STATS)?.history_stats.clone())
    }

    async fn history_clear(&self, days: Option<u32>) -> BackendResult<u32> {
        let mut state = self.record(names::HISTORY_CLEAR)?;
        if days.is_some() {
            // Fixture records are all recent
            return Ok(0);
        }
        let cleared = u32::try_from(state.history.len()).unwrap();
        state.history.clear();
        state.history_stats = HistoryStats::default();
        Ok(cleared)
    }

    async fn history_remove(&self, id: &str) -> BackendResult<bool> {
        let mut state = self.record(names::HISTORY_REMOVE)?;
        let before = state.history.len();
        state.history.retain(|r| r.id != id);
        Ok(before != state.history.len())
    }

    async fn disk_space(&self, path: &str) -> BackendResult<DiskSpace> {
        self.record(names::DISK_SPACE_GET)?;
        Ok(DiskSpace {
            path: path.to_string(),
            total_bytes: 1000,
            available_bytes: DISK_AVAILABLE,
            used_bytes: 600,
        })
    }

    async fn check_disk_space(&self, _path: &str, required_bytes: u64) -> BackendResult<bool> {
        self.record(names::DISK_SPACE_CHECK)?;
        Ok(required_bytes <= DISK_AVAILABLE)
    }
}
