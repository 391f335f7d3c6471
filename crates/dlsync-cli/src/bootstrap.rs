//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Backend process (via dlsync-sidecar)
//! - Settings persistence (JSON file via dlsync-client)
//! - The download queue client itself
//!
//! Command handlers receive the composed context and delegate to the client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dlsync_client::{ClientDeps, CommandAdapter, DownloadQueueClient, JsonSettingsRepository};
use dlsync_sidecar::{SidecarBackend, SidecarConfig};
use tracing::{debug, warn};

use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Backend executable to spawn.
    pub backend: PathBuf,
    /// Extra arguments for the backend.
    pub backend_args: Vec<String>,
    /// Settings file override.
    pub settings_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            backend: cli.backend.clone(),
            backend_args: cli.backend_args.clone(),
            settings_path: cli.settings.clone(),
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    client: DownloadQueueClient,
    backend: Arc<SidecarBackend>,
}

impl CliContext {
    /// Access the download queue client.
    #[must_use]
    pub const fn client(&self) -> &DownloadQueueClient {
        &self.client
    }

    /// The client, provided the backend is still running.
    ///
    /// Without a backend most client actions are silent no-ops, so
    /// commands that change the queue check this first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend process has exited.
    pub fn live_client(&self) -> Result<&DownloadQueueClient> {
        if !self.client.is_available() {
            bail!("Download backend is not running");
        }
        Ok(&self.client)
    }

    /// Unmount the client and stop the backend process.
    pub async fn shutdown(self) {
        self.client.unmount().await;
        if let Err(e) = self.backend.shutdown().await {
            warn!(error = %e, "Backend did not stop cleanly");
        }
    }
}

/// Spawn the backend and compose the client over it.
///
/// # Errors
///
/// Returns an error if the backend executable cannot be started.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let sidecar = SidecarConfig::new(&config.backend).with_args(config.backend_args);
    let backend = Arc::new(
        SidecarBackend::spawn(sidecar)
            .await
            .with_context(|| format!("Could not start backend {}", config.backend.display()))?,
    );

    let settings = config
        .settings_path
        .map_or_else(
            JsonSettingsRepository::in_data_dir,
            JsonSettingsRepository::new,
        );
    debug!(path = %settings.path().display(), "Using settings file");

    let deps = ClientDeps::new(
        Arc::new(CommandAdapter::new(backend.clone())),
        backend.clone(),
        Arc::new(settings),
    );
    let client = DownloadQueueClient::new(deps).await;

    Ok(CliContext { client, backend })
}
