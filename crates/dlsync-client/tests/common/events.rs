//! Event source doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dlsync_client::LocalEventHub;
use dlsync_core::ports::{EventHandler, EventSourcePort, ListenError, Subscription};

/// Delivers through a [`LocalEventHub`], counts every release per channel
/// and can be told to fail the n-th `listen` call.
pub struct RecordingEventSource {
    hub: LocalEventHub,
    fail_at: Option<usize>,
    attempts: AtomicUsize,
    releases: Arc<Mutex<HashMap<String, usize>>>,
}

impl RecordingEventSource {
    pub fn new(hub: LocalEventHub) -> Self {
        Self {
            hub,
            fail_at: None,
            attempts: AtomicUsize::new(0),
            releases: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fail the `index`-th (0-based) subscription attempt.
    pub fn failing_at(hub: LocalEventHub, index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(hub)
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Release count per channel.
    pub fn releases(&self) -> HashMap<String, usize> {
        self.releases.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSourcePort for RecordingEventSource {
    async fn listen(
        &self,
        channel: &'static str,
        handler: EventHandler,
    ) -> Result<Subscription, ListenError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(attempt) {
            return Err(ListenError::new(channel, "listener registry full"));
        }

        let inner = self.hub.listen(channel, handler).await?;
        let releases = Arc::clone(&self.releases);
        Ok(Subscription::new(channel, move || {
            *releases
                .lock()
                .unwrap()
                .entry(channel.to_string())
                .or_insert(0) += 1;
            inner.release();
        }))
    }
}
