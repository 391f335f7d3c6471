//! Store refreshes and event application.
//!
//! `QueueSync` is the piece shared by the event bridge and the facade: it
//! owns the store handle and the command port and knows how to pull a fresh
//! snapshot of each slice. Refreshes never fail; an error is logged and the
//! previous state is kept.

use std::sync::{Arc, Mutex, PoisonError};

use dlsync_core::ports::DownloadCommandsPort;
use dlsync_core::registry::Registration;
use dlsync_core::{BackendEvent, DownloadStore, HISTORY_LIMIT, TaskPatch, TaskState};
use tracing::{debug, warn};

/// Refresh and event-application logic over a shared [`DownloadStore`].
#[derive(Clone)]
pub struct QueueSync {
    commands: Arc<dyn DownloadCommandsPort>,
    store: DownloadStore,
    activity: Arc<Mutex<Option<Registration>>>,
}

impl QueueSync {
    pub fn new(commands: Arc<dyn DownloadCommandsPort>, store: DownloadStore) -> Self {
        Self {
            commands,
            store,
            activity: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &DownloadStore {
        &self.store
    }

    #[must_use]
    pub fn commands(&self) -> &Arc<dyn DownloadCommandsPort> {
        &self.commands
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.commands.is_available()
    }

    // =========================================================================
    // Refreshes
    // =========================================================================

    /// Replace the task list with the backend's.
    pub async fn refresh_tasks(&self) {
        if !self.is_available() {
            return;
        }
        match self.commands.list_downloads().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Refreshed task list");
                self.store.set_tasks(tasks);
                self.publish_activity();
            }
            Err(e) => warn!(error = %e, "Failed to refresh download tasks"),
        }
    }

    pub async fn refresh_stats(&self) {
        if !self.is_available() {
            return;
        }
        match self.commands.queue_stats().await {
            Ok(stats) => self.store.set_stats(stats),
            Err(e) => warn!(error = %e, "Failed to refresh queue stats"),
        }
    }

    /// Reload the most recent history records.
    pub async fn refresh_history(&self) {
        if !self.is_available() {
            return;
        }
        let limit = u32::try_from(HISTORY_LIMIT).unwrap_or(u32::MAX);
        match self.commands.history_list(limit).await {
            Ok(records) => self.store.set_history(records),
            Err(e) => warn!(error = %e, "Failed to refresh download history"),
        }
    }

    pub async fn refresh_history_stats(&self) {
        if !self.is_available() {
            return;
        }
        match self.commands.history_stats().await {
            Ok(stats) => self.store.set_history_stats(stats),
            Err(e) => warn!(error = %e, "Failed to refresh history stats"),
        }
    }

    /// Mirror the backend's current speed limit.
    pub async fn refresh_speed_limit(&self) {
        if !self.is_available() {
            return;
        }
        match self.commands.get_speed_limit().await {
            Ok(limit) => self.store.set_speed_limit(limit),
            Err(e) => warn!(error = %e, "Failed to refresh speed limit"),
        }
    }

    /// Initial load of every backend-owned slice.
    pub async fn hydrate(&self) {
        futures_util::join!(
            self.refresh_tasks(),
            self.refresh_stats(),
            self.refresh_history(),
            self.refresh_history_stats(),
            self.refresh_speed_limit(),
        );
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply one backend event to the store.
    pub async fn apply_event(&self, event: BackendEvent) {
        match event {
            // The payload only carries the id; pull the full row and ordering
            BackendEvent::TaskAdded { .. } => self.refresh_tasks().await,
            BackendEvent::TaskStarted { task_id } => {
                self.store
                    .update_task(&task_id, TaskPatch::state(TaskState::Downloading));
            }
            BackendEvent::TaskProgress { task_id, progress } => {
                self.store.update_task_progress(&task_id, progress);
            }
            BackendEvent::TaskCompleted { task_id } => {
                self.store
                    .update_task(&task_id, TaskPatch::state(TaskState::Completed));
                self.refresh_history().await;
            }
            BackendEvent::TaskFailed { task_id, error } => {
                self.store.update_task(&task_id, TaskPatch::failed(error));
            }
            BackendEvent::TaskPaused { task_id } => {
                self.store
                    .update_task(&task_id, TaskPatch::state(TaskState::Paused));
            }
            BackendEvent::TaskResumed { task_id } => {
                self.store
                    .update_task(&task_id, TaskPatch::state(TaskState::Queued));
            }
            BackendEvent::TaskCancelled { task_id } => {
                self.store
                    .update_task(&task_id, TaskPatch::state(TaskState::Cancelled));
            }
            BackendEvent::QueueUpdated { stats } => self.store.set_stats(stats),
        }
        self.publish_activity();
    }

    // =========================================================================
    // Activity registry
    // =========================================================================

    pub(crate) fn attach_activity(&self, registration: Registration) {
        *self.activity.lock().unwrap_or_else(PoisonError::into_inner) = Some(registration);
        self.publish_activity();
    }

    pub(crate) fn detach_activity(&self) {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Push the current in-flight flag to the registry, if registered.
    pub(crate) fn publish_activity(&self) {
        let guard = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(registration) = guard.as_ref() {
            registration.set_active(self.store.has_in_flight());
        }
    }
}
