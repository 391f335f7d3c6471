//! Task and queue actions.

use std::sync::Arc;

use dlsync_core::ports::DownloadCommandsPort;
use dlsync_core::{DownloadRequest, DownloadStore, DownloadTask, TaskId};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::sync::QueueSync;

/// Per-id command used by the selection bulk actions.
#[derive(Clone, Copy, Debug)]
enum TaskCommand {
    Pause,
    Resume,
    Cancel,
    Remove,
}

impl TaskCommand {
    const fn verb(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
            Self::Remove => "remove",
        }
    }
}

/// Download queue action handler.
pub struct DownloadOps<'a> {
    commands: &'a Arc<dyn DownloadCommandsPort>,
    sync: &'a QueueSync,
}

impl<'a> DownloadOps<'a> {
    pub fn new(sync: &'a QueueSync) -> Self {
        Self {
            commands: sync.commands(),
            sync,
        }
    }

    fn store(&self) -> &DownloadStore {
        self.sync.store()
    }

    fn available(&self) -> bool {
        self.commands.is_available()
    }

    // =========================================================================
    // Single-task actions
    // =========================================================================

    /// Enqueue a download, then reload the task list.
    ///
    /// The refresh runs even if the `download-task-added` event is also on
    /// its way; both paths replace the list wholesale.
    pub async fn add(&self, request: &DownloadRequest) -> ClientResult<TaskId> {
        if !self.available() {
            return Err(ClientError::unavailable("add a download"));
        }
        let id = self.commands.add_download(request).await?;
        info!(task_id = %id, url = %request.url, "Download added");
        self.sync.refresh_tasks().await;
        Ok(id)
    }

    pub async fn get(&self, id: &TaskId) -> ClientResult<DownloadTask> {
        if !self.available() {
            return Err(ClientError::unavailable("get a download"));
        }
        Ok(self.commands.get_download(id).await?)
    }

    /// Ask the backend to pause. The store changes when the event arrives.
    pub async fn pause(&self, id: &TaskId) -> ClientResult<()> {
        if !self.available() {
            return Ok(());
        }
        Ok(self.commands.pause_download(id).await?)
    }

    pub async fn resume(&self, id: &TaskId) -> ClientResult<()> {
        if !self.available() {
            return Ok(());
        }
        Ok(self.commands.resume_download(id).await?)
    }

    pub async fn cancel(&self, id: &TaskId) -> ClientResult<()> {
        if !self.available() {
            return Ok(());
        }
        Ok(self.commands.cancel_download(id).await?)
    }

    /// Remove a task. There is no remove event, so a confirmed removal is
    /// applied to the store here.
    pub async fn remove(&self, id: &TaskId) -> ClientResult<bool> {
        if !self.available() {
            return Ok(false);
        }
        let removed = self.commands.remove_download(id).await?;
        if removed {
            self.store().remove_task(id);
            self.sync.publish_activity();
            debug!(task_id = %id, "Download removed");
        }
        Ok(removed)
    }

    // =========================================================================
    // Bulk actions
    // =========================================================================

    pub async fn pause_all(&self) -> ClientResult<u32> {
        if !self.available() {
            return Ok(0);
        }
        Ok(self.commands.pause_all().await?)
    }

    pub async fn resume_all(&self) -> ClientResult<u32> {
        if !self.available() {
            return Ok(0);
        }
        Ok(self.commands.resume_all().await?)
    }

    pub async fn cancel_all(&self) -> ClientResult<u32> {
        if !self.available() {
            return Ok(0);
        }
        Ok(self.commands.cancel_all().await?)
    }

    /// Drop finished tasks backend-side and reload the list, since several
    /// rows disappear at once without per-task events.
    pub async fn clear_finished(&self) -> ClientResult<u32> {
        if !self.available() {
            return Ok(0);
        }
        let cleared = self.commands.clear_finished().await?;
        self.sync.refresh_tasks().await;
        Ok(cleared)
    }

    pub async fn retry_failed(&self) -> ClientResult<u32> {
        if !self.available() {
            return Ok(0);
        }
        Ok(self.commands.retry_failed().await?)
    }

    // =========================================================================
    // Selection actions
    // =========================================================================

    pub async fn pause_selected(&self) -> u32 {
        self.for_each_selected(TaskCommand::Pause).await
    }

    pub async fn resume_selected(&self) -> u32 {
        self.for_each_selected(TaskCommand::Resume).await
    }

    pub async fn cancel_selected(&self) -> u32 {
        self.for_each_selected(TaskCommand::Cancel).await
    }

    pub async fn remove_selected(&self) -> u32 {
        self.for_each_selected(TaskCommand::Remove).await
    }

    /// Run `command` for every selected id, one at a time.
    ///
    /// Failures are logged and skipped. Returns how many ids the backend
    /// accepted.
    async fn for_each_selected(&self, command: TaskCommand) -> u32 {
        if !self.available() {
            return 0;
        }
        let mut accepted = 0;
        for id in self.store().selected_ids() {
            let result = match command {
                TaskCommand::Pause => self.pause(&id).await.map(|()| true),
                TaskCommand::Resume => self.resume(&id).await.map(|()| true),
                TaskCommand::Cancel => self.cancel(&id).await.map(|()| true),
                TaskCommand::Remove => self.remove(&id).await,
            };
            match result {
                Ok(true) => accepted += 1,
                Ok(false) => {
                    debug!(task_id = %id, action = command.verb(), "Backend did not apply action");
                }
                Err(e) => {
                    warn!(
                        task_id = %id,
                        action = command.verb(),
                        error = %e,
                        "Selected task action failed"
                    );
                }
            }
        }
        accepted
    }
}
