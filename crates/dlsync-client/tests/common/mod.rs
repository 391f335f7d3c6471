//! Common test utilities.
//!
//! Provides an in-memory fake backend, a recording event source and task
//! fixtures shared by the integration tests.

#![allow(dead_code)]

pub mod events;
pub mod fake_backend;
pub mod fixtures;

use std::sync::Arc;

use dlsync_client::{ClientDeps, DownloadQueueClient, LocalEventHub};
use dlsync_core::InMemorySettingsRepository;
use dlsync_core::ports::{EventSourcePort, SettingsRepository};

use fake_backend::FakeCommands;

/// A client wired to fakes, with handles to each fake for assertions.
pub struct Harness {
    pub client: DownloadQueueClient,
    pub backend: Arc<FakeCommands>,
    pub hub: LocalEventHub,
    pub settings: Arc<InMemorySettingsRepository>,
}

/// Build a client over `backend` with an in-process hub as event source.
pub async fn harness(backend: FakeCommands) -> Harness {
    let hub = LocalEventHub::new();
    harness_with_source(backend, Arc::new(hub.clone()), hub).await
}

/// Build a client with a custom event source. `hub` is the hub that source
/// delivers from.
pub async fn harness_with_source(
    backend: FakeCommands,
    source: Arc<dyn EventSourcePort>,
    hub: LocalEventHub,
) -> Harness {
    let backend = Arc::new(backend);
    let settings = Arc::new(InMemorySettingsRepository::new());
    let deps = ClientDeps::new(
        backend.clone(),
        source,
        settings.clone() as Arc<dyn SettingsRepository>,
    );
    Harness {
        client: DownloadQueueClient::new(deps).await,
        backend,
        hub,
        settings,
    }
}
