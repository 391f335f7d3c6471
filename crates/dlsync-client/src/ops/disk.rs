//! Disk space probes. Read-only, no store interaction.

use std::sync::Arc;

use dlsync_core::DiskSpace;
use dlsync_core::ports::DownloadCommandsPort;

use crate::error::{ClientError, ClientResult};

pub struct DiskOps<'a> {
    commands: &'a Arc<dyn DownloadCommandsPort>,
}

impl<'a> DiskOps<'a> {
    pub const fn new(commands: &'a Arc<dyn DownloadCommandsPort>) -> Self {
        Self { commands }
    }

    pub async fn space(&self, path: &str) -> ClientResult<DiskSpace> {
        if !self.commands.is_available() {
            return Err(ClientError::unavailable("query disk space"));
        }
        Ok(self.commands.disk_space(path).await?)
    }

    /// Whether `required_bytes` fit under `path`. `false` without a backend.
    pub async fn check(&self, path: &str, required_bytes: u64) -> ClientResult<bool> {
        if !self.commands.is_available() {
            return Ok(false);
        }
        Ok(self.commands.check_disk_space(path, required_bytes).await?)
    }
}
