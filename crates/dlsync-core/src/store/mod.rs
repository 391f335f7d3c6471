//! Task and history store with change notification.
//!
//! [`DownloadStore`] is the single source of truth the UI (or CLI) reads
//! from. It is cheap to clone; clones share state. Every mutating action
//! runs as one critical section and bumps a revision counter published on a
//! [`tokio::sync::watch`] channel, so observers never see torn state and can
//! simply re-read on each change.

mod state;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::{
    DownloadTask, HistoryRecord, HistoryStats, QueueStats, TaskId, TaskPatch, TaskProgress,
    TaskState,
};
use crate::settings::ClientSettings;

pub use state::{HISTORY_LIMIT, PatchOutcome, StoreState};

/// Shared, observable download store.
#[derive(Clone)]
pub struct DownloadStore {
    state: Arc<RwLock<StoreState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for DownloadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DownloadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadStore")
            .field("revision", &self.revision())
            .field("tasks", &self.read().tasks.len())
            .finish_non_exhaustive()
    }
}

impl DownloadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ClientSettings::default())
    }

    /// Start from previously persisted settings.
    #[must_use]
    pub fn with_settings(settings: ClientSettings) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(StoreState {
                settings,
                ..StoreState::default()
            })),
            revision: Arc::new(tx),
        }
    }

    /// Receive a notification after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Number of changes applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Consistent copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the write lock and publish a new revision if it
    /// reports a change.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> (R, bool)) -> R {
        let (result, changed) = {
            let mut state = self.write();
            f(&mut state)
        };
        if changed {
            self.revision.send_modify(|rev| *rev += 1);
        }
        result
    }

    // ========== Reads ==========

    #[must_use]
    pub fn tasks(&self) -> Vec<DownloadTask> {
        self.read().tasks.clone()
    }

    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<DownloadTask> {
        self.read().task(id).cloned()
    }

    /// Tasks currently downloading.
    #[must_use]
    pub fn active(&self) -> Vec<DownloadTask> {
        self.read().in_state(TaskState::Downloading)
    }

    #[must_use]
    pub fn paused(&self) -> Vec<DownloadTask> {
        self.read().in_state(TaskState::Paused)
    }

    #[must_use]
    pub fn completed(&self) -> Vec<DownloadTask> {
        self.read().in_state(TaskState::Completed)
    }

    #[must_use]
    pub fn failed(&self) -> Vec<DownloadTask> {
        self.read().in_state(TaskState::Failed)
    }

    #[must_use]
    pub fn queued(&self) -> Vec<DownloadTask> {
        self.read().in_state(TaskState::Queued)
    }

    /// Whether any mirrored task is queued or downloading.
    #[must_use]
    pub fn has_in_flight(&self) -> bool {
        self.read().has_in_flight()
    }

    #[must_use]
    pub fn stats(&self) -> Option<QueueStats> {
        self.read().stats.clone()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<TaskId> {
        self.read().selected.iter().cloned().collect()
    }

    #[must_use]
    pub fn is_selected(&self, id: &TaskId) -> bool {
        self.read().selected.contains(id)
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.read().history.clone()
    }

    #[must_use]
    pub fn history_stats(&self) -> Option<HistoryStats> {
        self.read().history_stats.clone()
    }

    #[must_use]
    pub fn settings(&self) -> ClientSettings {
        self.read().settings.clone()
    }

    #[must_use]
    pub fn speed_limit(&self) -> u64 {
        self.read().settings.speed_limit
    }

    #[must_use]
    pub fn max_concurrent(&self) -> u32 {
        self.read().settings.max_concurrent
    }

    #[must_use]
    pub fn show_history(&self) -> bool {
        self.read().settings.show_history
    }

    // ========== Task mutations ==========

    /// Replace the whole task list.
    pub fn set_tasks(&self, tasks: Vec<DownloadTask>) {
        self.mutate(|state| {
            state.set_tasks(tasks, Utc::now());
            ((), true)
        });
    }

    pub fn add_task(&self, task: DownloadTask) {
        self.mutate(|state| {
            state.add_task(task, Utc::now());
            ((), true)
        });
    }

    /// Merge-patch a task. Returns `false` when the id is unknown.
    ///
    /// Transitions outside the lifecycle graph are applied anyway; the
    /// backend is authoritative.
    pub fn update_task(&self, id: &TaskId, patch: TaskPatch) -> bool {
        let outcome = self.mutate(|state| {
            let outcome = state.update_task(id, patch, Utc::now());
            (outcome, outcome != PatchOutcome::Missing)
        });
        match outcome {
            PatchOutcome::Missing => {
                debug!(task_id = %id, "Ignoring update for unknown task");
                false
            }
            PatchOutcome::Unexpected { from, to } => {
                debug!(task_id = %id, %from, %to, "Applied unexpected state transition");
                true
            }
            PatchOutcome::Applied => true,
        }
    }

    pub fn update_task_progress(&self, id: &TaskId, progress: TaskProgress) -> bool {
        self.mutate(|state| {
            let changed = state.update_task_progress(id, progress);
            (changed, changed)
        })
    }

    pub fn remove_task(&self, id: &TaskId) -> bool {
        self.mutate(|state| {
            let changed = state.remove_task(id);
            (changed, changed)
        })
    }

    pub fn set_stats(&self, stats: QueueStats) {
        self.mutate(|state| {
            state.stats = Some(stats);
            ((), true)
        });
    }

    // ========== Selection ==========

    pub fn select(&self, id: &TaskId) -> bool {
        self.mutate(|state| {
            let changed = state.select(id);
            (changed, changed)
        })
    }

    pub fn deselect(&self, id: &TaskId) -> bool {
        self.mutate(|state| {
            let changed = state.deselect(id);
            (changed, changed)
        })
    }

    pub fn toggle_selection(&self, id: &TaskId) -> bool {
        self.mutate(|state| {
            let changed = state.toggle_selection(id);
            (changed, changed)
        })
    }

    pub fn select_all(&self) {
        self.mutate(|state| ((), state.select_all()));
    }

    pub fn clear_selection(&self) {
        self.mutate(|state| ((), state.clear_selection()));
    }

    // ========== History ==========

    pub fn add_history_record(&self, record: HistoryRecord) {
        self.mutate(|state| {
            state.add_history_record(record);
            ((), true)
        });
    }

    pub fn set_history(&self, records: Vec<HistoryRecord>) {
        self.mutate(|state| {
            state.set_history(records);
            ((), true)
        });
    }

    pub fn remove_history_record(&self, id: &str) -> bool {
        self.mutate(|state| {
            let changed = state.remove_history_record(id);
            (changed, changed)
        })
    }

    pub fn clear_history(&self) {
        self.mutate(|state| {
            state.clear_history();
            ((), true)
        });
    }

    pub fn set_history_stats(&self, stats: HistoryStats) {
        self.mutate(|state| {
            state.history_stats = Some(stats);
            ((), true)
        });
    }

    // ========== Settings ==========

    pub fn set_speed_limit(&self, bytes_per_sec: u64) {
        self.mutate(|state| {
            let changed = state.settings.speed_limit != bytes_per_sec;
            state.settings.speed_limit = bytes_per_sec;
            ((), changed)
        });
    }

    pub fn set_max_concurrent(&self, max: u32) {
        self.mutate(|state| {
            let changed = state.settings.max_concurrent != max;
            state.settings.max_concurrent = max;
            ((), changed)
        });
    }

    pub fn set_show_history(&self, show: bool) {
        self.mutate(|state| {
            let changed = state.settings.show_history != show;
            state.settings.show_history = show;
            ((), changed)
        });
    }

}
