//! History actions.

use std::sync::Arc;

use dlsync_core::HistoryRecord;
use dlsync_core::ports::DownloadCommandsPort;
use tracing::warn;

use crate::error::ClientResult;
use crate::sync::QueueSync;

/// Download history action handler.
pub struct HistoryOps<'a> {
    commands: &'a Arc<dyn DownloadCommandsPort>,
    sync: &'a QueueSync,
}

impl<'a> HistoryOps<'a> {
    pub fn new(sync: &'a QueueSync) -> Self {
        Self {
            commands: sync.commands(),
            sync,
        }
    }

    /// Search the full backend history. Errors yield an empty list.
    pub async fn search(&self, query: &str) -> Vec<HistoryRecord> {
        if !self.commands.is_available() {
            return Vec::new();
        }
        match self.commands.history_search(query).await {
            Ok(records) => records,
            Err(e) => {
                warn!(query, error = %e, "History search failed");
                Vec::new()
            }
        }
    }

    /// Clear history, or only records older than `days`.
    ///
    /// A full clear empties the cache directly; a partial one reloads it.
    pub async fn clear(&self, days: Option<u32>) -> ClientResult<u32> {
        if !self.commands.is_available() {
            return Ok(0);
        }
        let cleared = self.commands.history_clear(days).await?;
        match days {
            None => self.sync.store().clear_history(),
            Some(_) => self.sync.refresh_history().await,
        }
        self.sync.refresh_history_stats().await;
        Ok(cleared)
    }

    pub async fn remove(&self, id: &str) -> ClientResult<bool> {
        if !self.commands.is_available() {
            return Ok(false);
        }
        let removed = self.commands.history_remove(id).await?;
        if removed {
            self.sync.store().remove_history_record(id);
            self.sync.refresh_history_stats().await;
        }
        Ok(removed)
    }
}
