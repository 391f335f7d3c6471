//! Plain store state and its transition functions.
//!
//! Everything here is synchronous and I/O free. [`DownloadStore`] wraps a
//! `StoreState` behind a lock and calls exactly one of these per action.
//!
//! [`DownloadStore`]: super::DownloadStore

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::{
    DownloadTask, HistoryRecord, HistoryStats, QueueStats, TaskId, TaskPatch, TaskProgress,
    TaskState,
};
use crate::settings::ClientSettings;

/// Maximum number of history records cached client-side.
pub const HISTORY_LIMIT: usize = 100;

/// Snapshot of everything the client mirrors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Newest first.
    pub tasks: Vec<DownloadTask>,
    /// Last queue counters pushed or fetched, `None` before hydration.
    pub stats: Option<QueueStats>,
    /// Always a subset of the ids in `tasks`.
    pub selected: BTreeSet<TaskId>,
    /// Newest first, at most [`HISTORY_LIMIT`] entries.
    pub history: Vec<HistoryRecord>,
    /// `None` before hydration and after a full clear.
    pub history_stats: Option<HistoryStats>,
    /// The persisted client-owned values.
    pub settings: ClientSettings,
}

/// Outcome of a patch against the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No task with that id.
    Missing,
    /// Applied along a lifecycle edge.
    Applied,
    /// Applied, but the state change is not a lifecycle edge.
    Unexpected { from: TaskState, to: TaskState },
}

impl StoreState {
    pub fn task(&self, id: &TaskId) -> Option<&DownloadTask> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut DownloadTask> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.task(id).is_some()
    }

    /// Tasks currently in `state`, in list order.
    pub fn in_state(&self, state: TaskState) -> Vec<DownloadTask> {
        self.tasks
            .iter()
            .filter(|task| task.state == state)
            .cloned()
            .collect()
    }

    /// Whether any task is queued or downloading.
    pub fn has_in_flight(&self) -> bool {
        self.tasks.iter().any(|task| task.state.is_in_flight())
    }

    // ========== Tasks ==========

    /// Replace the whole task list.
    ///
    /// Duplicate ids keep their first occurrence. The selection is pruned to
    /// the surviving ids.
    pub fn set_tasks(&mut self, tasks: Vec<DownloadTask>, now: DateTime<Utc>) {
        let mut seen = BTreeSet::new();
        let tasks: Vec<_> = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id.clone()))
            .map(|mut task| {
                self.settle(&mut task, now);
                task
            })
            .collect();
        self.tasks = tasks;
        self.prune_selection();
    }

    /// Insert at the head, replacing any task with the same id.
    pub fn add_task(&mut self, mut task: DownloadTask, now: DateTime<Utc>) {
        self.settle(&mut task, now);
        self.tasks.retain(|existing| existing.id != task.id);
        self.tasks.insert(0, task);
    }

    /// Normalize an incoming snapshot.
    ///
    /// A terminal snapshot without `completed_at` keeps the time already
    /// mirrored for that id, so repeated refreshes do not move it.
    fn settle(&self, task: &mut DownloadTask, now: DateTime<Utc>) {
        if task.state.is_terminal() && task.completed_at.is_none() {
            task.completed_at = self
                .task(&task.id)
                .filter(|known| known.state.is_terminal())
                .and_then(|known| known.completed_at);
        }
        task.normalize(now);
    }

    pub fn update_task(
        &mut self,
        id: &TaskId,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> PatchOutcome {
        let Some(task) = self.task_mut(id) else {
            return PatchOutcome::Missing;
        };
        let from = task.state;
        let to = patch.state.unwrap_or(from);
        if task.apply_patch(patch, now) {
            PatchOutcome::Applied
        } else {
            PatchOutcome::Unexpected { from, to }
        }
    }

    /// Replace a task's progress and nothing else.
    pub fn update_task_progress(&mut self, id: &TaskId, progress: TaskProgress) -> bool {
        match self.task_mut(id) {
            Some(task) => {
                task.progress = progress;
                true
            }
            None => false,
        }
    }

    /// Drop a task and its selection entry. Returns whether anything changed.
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        let deselected = self.selected.remove(id);
        before != self.tasks.len() || deselected
    }

    // ========== Selection ==========

    /// Select a known task. Unknown ids are ignored.
    pub fn select(&mut self, id: &TaskId) -> bool {
        self.contains(id) && self.selected.insert(id.clone())
    }

    pub fn deselect(&mut self, id: &TaskId) -> bool {
        self.selected.remove(id)
    }

    pub fn toggle_selection(&mut self, id: &TaskId) -> bool {
        if self.selected.contains(id) {
            self.selected.remove(id)
        } else {
            self.select(id)
        }
    }

    pub fn select_all(&mut self) -> bool {
        let all: BTreeSet<TaskId> = self.tasks.iter().map(|task| task.id.clone()).collect();
        if all == self.selected {
            return false;
        }
        self.selected = all;
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    fn prune_selection(&mut self) {
        let tasks = &self.tasks;
        self.selected
            .retain(|id| tasks.iter().any(|task| &task.id == id));
    }

    // ========== History ==========

    /// Prepend a record, evicting the oldest beyond [`HISTORY_LIMIT`].
    pub fn add_history_record(&mut self, record: HistoryRecord) {
        self.history.insert(0, record);
        self.history.truncate(HISTORY_LIMIT);
    }

    pub fn set_history(&mut self, mut records: Vec<HistoryRecord>) {
        records.truncate(HISTORY_LIMIT);
        self.history = records;
    }

    pub fn remove_history_record(&mut self, id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|record| record.id != id);
        before != self.history.len()
    }

    /// Empty the cache. The stats no longer describe anything, so they go too.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history_stats = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> DownloadTask {
        DownloadTask::new(id, format!("https://example.com/{id}"), "/tmp", id)
    }

    fn record(id: &str) -> HistoryRecord {
        HistoryRecord {
            id: id.to_string(),
            task_id: TaskId::from(id),
            url: format!("https://example.com/{id}"),
            destination: "/tmp".into(),
            name: id.into(),
            status: TaskState::Completed,
            total_bytes: 1,
            error: None,
            created_at: Utc::now(),
            completed_at: Utc::now(),
            duration_secs: 1,
            average_speed: 1.0,
        }
    }

    #[test]
    fn test_set_tasks_is_full_replace() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a"), task("b")], Utc::now());
        state.set_tasks(vec![task("c")], Utc::now());
        let ids: Vec<_> = state.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_set_tasks_prunes_selection() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a"), task("b")], Utc::now());
        state.select_all();
        state.set_tasks(vec![task("b")], Utc::now());
        assert_eq!(state.selected.len(), 1);
        assert!(state.selected.contains(&TaskId::from("b")));
    }

    #[test]
    fn test_set_tasks_drops_duplicate_ids() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a"), task("a")], Utc::now());
        assert_eq!(state.tasks.len(), 1);
    }

    #[test]
    fn test_refresh_keeps_mirrored_completion_time() {
        let mut state = StoreState::default();
        let mut done = task("a");
        done.state = TaskState::Completed;

        let first = Utc::now();
        state.set_tasks(vec![done.clone()], first);
        assert_eq!(state.tasks[0].completed_at, Some(first));

        let later = first + chrono::Duration::seconds(60);
        state.set_tasks(vec![done.clone()], later);
        assert_eq!(state.tasks[0].completed_at, Some(first));

        // A task that left the terminal state earns a fresh time
        state.tasks[0].state = TaskState::Queued;
        state.tasks[0].completed_at = None;
        state.set_tasks(vec![done], later);
        assert_eq!(state.tasks[0].completed_at, Some(later));
    }

    #[test]
    fn test_add_task_inserts_at_head_and_replaces() {
        let mut state = StoreState::default();
        state.add_task(task("a"), Utc::now());
        state.add_task(task("b"), Utc::now());
        state.add_task(task("a"), Utc::now());
        let ids: Vec<_> = state.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_update_missing_task_is_noop() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a")], Utc::now());
        let before = state.clone();
        let outcome = state.update_task(
            &TaskId::from("missing-id"),
            TaskPatch::state(TaskState::Downloading),
            Utc::now(),
        );
        assert_eq!(outcome, PatchOutcome::Missing);
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_reports_unexpected_edge() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a")], Utc::now());
        let outcome = state.update_task(
            &TaskId::from("a"),
            TaskPatch::state(TaskState::Completed),
            Utc::now(),
        );
        assert_eq!(
            outcome,
            PatchOutcome::Unexpected {
                from: TaskState::Queued,
                to: TaskState::Completed,
            }
        );
        assert_eq!(state.tasks[0].state, TaskState::Completed);
    }

    #[test]
    fn test_progress_only_touches_progress() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a")], Utc::now());
        let before = state.tasks[0].clone();

        let progress = TaskProgress::new(10, Some(100), 5.0);
        assert!(state.update_task_progress(&TaskId::from("a"), progress.clone()));

        let after = &state.tasks[0];
        assert_eq!(after.progress, progress);
        assert_eq!(after.state, before.state);
        assert_eq!(after.error, before.error);
        assert_eq!(after.started_at, before.started_at);
        assert_eq!(after.completed_at, before.completed_at);
    }

    #[test]
    fn test_remove_task_is_idempotent() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a"), task("b")], Utc::now());
        state.select(&TaskId::from("a"));

        assert!(state.remove_task(&TaskId::from("a")));
        let after_first = state.clone();
        assert!(!state.remove_task(&TaskId::from("a")));
        assert_eq!(state, after_first);
        assert!(state.selected.is_empty());
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let mut state = StoreState::default();
        assert!(!state.select(&TaskId::from("ghost")));
        assert!(state.selected.is_empty());
    }

    #[test]
    fn test_toggle_selection() {
        let mut state = StoreState::default();
        state.set_tasks(vec![task("a")], Utc::now());
        let id = TaskId::from("a");
        assert!(state.toggle_selection(&id));
        assert!(state.selected.contains(&id));
        assert!(state.toggle_selection(&id));
        assert!(!state.selected.contains(&id));
    }

    #[test]
    fn test_history_cap_keeps_newest_first() {
        let mut state = StoreState::default();
        for i in 0..105 {
            state.add_history_record(record(&format!("h{i}")));
        }
        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history[0].id, "h104");
        assert_eq!(state.history[HISTORY_LIMIT - 1].id, "h5");
    }

    #[test]
    fn test_clear_history_nulls_stats() {
        let mut state = StoreState::default();
        state.add_history_record(record("h1"));
        state.history_stats = Some(HistoryStats::default());
        state.clear_history();
        assert!(state.history.is_empty());
        assert!(state.history_stats.is_none());
    }
}
