//! Dependency injection for `DownloadQueueClient`.
//!
//! All dependencies are injected as trait objects to keep the client
//! independent of any transport.

use std::sync::Arc;

use dlsync_core::ports::{DownloadCommandsPort, EventSourcePort, SettingsRepository};

/// Dependencies required to construct a `DownloadQueueClient`.
///
/// # Example
///
/// ```ignore
/// let backend = Arc::new(SidecarBackend::spawn(config).await?);
/// let deps = ClientDeps::new(
///     Arc::new(CommandAdapter::new(backend.clone())),
///     backend,
///     Arc::new(JsonSettingsRepository::in_data_dir()?),
/// );
/// let client = DownloadQueueClient::new(deps).await;
/// ```
#[derive(Clone)]
pub struct ClientDeps {
    /// Typed backend command surface.
    pub(crate) commands: Arc<dyn DownloadCommandsPort>,
    /// Source of backend push events.
    pub(crate) events: Arc<dyn EventSourcePort>,
    /// Persistence for the client-owned settings.
    pub(crate) settings: Arc<dyn SettingsRepository>,
}

impl ClientDeps {
    pub fn new(
        commands: Arc<dyn DownloadCommandsPort>,
        events: Arc<dyn EventSourcePort>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            commands,
            events,
            settings,
        }
    }
}
