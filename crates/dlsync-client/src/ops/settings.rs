//! Queue settings actions.
//!
//! Speed limit and concurrency are write-through: the backend call comes
//! first, then the store mirrors the value without waiting for an event,
//! then the value is persisted. A persistence failure is logged only; the
//! backend already holds the new value.

use std::sync::Arc;

use dlsync_core::ports::{DownloadCommandsPort, SettingsRepository};
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::sync::QueueSync;

/// Settings action handler.
pub struct SettingsOps<'a> {
    commands: &'a Arc<dyn DownloadCommandsPort>,
    repository: &'a Arc<dyn SettingsRepository>,
    sync: &'a QueueSync,
}

impl<'a> SettingsOps<'a> {
    pub fn new(sync: &'a QueueSync, repository: &'a Arc<dyn SettingsRepository>) -> Self {
        Self {
            commands: sync.commands(),
            repository,
            sync,
        }
    }

    pub async fn set_speed_limit(&self, bytes_per_sec: u64) -> ClientResult<()> {
        if !self.commands.is_available() {
            return Ok(());
        }
        self.commands.set_speed_limit(bytes_per_sec).await?;
        self.sync.store().set_speed_limit(bytes_per_sec);
        info!(bytes_per_sec, "Speed limit updated");
        self.persist().await;
        Ok(())
    }

    pub async fn set_max_concurrent(&self, max: u32) -> ClientResult<()> {
        if !self.commands.is_available() {
            return Ok(());
        }
        self.commands.set_max_concurrent(max).await?;
        self.sync.store().set_max_concurrent(max);
        info!(max, "Max concurrent downloads updated");
        self.persist().await;
        Ok(())
    }

    /// Purely local; works without a backend.
    pub async fn set_show_history(&self, show: bool) {
        self.sync.store().set_show_history(show);
        self.persist().await;
    }

    async fn persist(&self) {
        let settings = self.sync.store().settings();
        if let Err(e) = self.repository.save(&settings).await {
            warn!(error = %e, "Failed to persist client settings");
        }
    }
}
