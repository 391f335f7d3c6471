//! In-process event source.
//!
//! `LocalEventHub` implements [`EventSourcePort`] without any transport:
//! whoever holds the hub publishes payloads with [`LocalEventHub::emit`] and
//! every handler registered on that channel is awaited in registration
//! order. Useful when the backend lives in the same process, and as the
//! event source in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use dlsync_core::BackendEvent;
use dlsync_core::ports::{EventHandler, EventSourcePort, ListenError, Subscription};
use serde_json::Value;
use tracing::trace;

type Listeners = HashMap<String, Vec<(u64, EventHandler)>>;

#[derive(Default)]
struct HubInner {
    listeners: Mutex<Listeners>,
    next_id: AtomicU64,
}

impl HubInner {
    fn lock(&self) -> MutexGuard<'_, Listeners> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, channel: &str, id: u64) {
        let mut listeners = self.lock();
        if let Some(handlers) = listeners.get_mut(channel) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                listeners.remove(channel);
            }
        }
    }
}

/// Channel-keyed fan-out of JSON payloads to async handlers.
#[derive(Clone, Default)]
pub struct LocalEventHub {
    inner: Arc<HubInner>,
}

impl LocalEventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every handler on `channel`.
    ///
    /// Returns the number of handlers invoked. The listener table is not
    /// locked while handlers run, so handlers may subscribe or release.
    pub async fn emit(&self, channel: &str, payload: Value) -> usize {
        let handlers: Vec<EventHandler> = self
            .inner
            .lock()
            .get(channel)
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        trace!(channel, listeners = handlers.len(), "Emitting event");
        for handler in &handlers {
            handler(payload.clone()).await;
        }
        handlers.len()
    }

    /// Encode and deliver a typed event on its channel.
    pub async fn emit_event(&self, event: &BackendEvent) -> usize {
        self.emit(event.channel(), event.payload()).await
    }

    /// Number of live handlers on `channel`.
    #[must_use]
    pub fn listener_count(&self, channel: &str) -> usize {
        self.inner.lock().get(channel).map_or(0, Vec::len)
    }

    /// Number of live handlers across all channels.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.inner.lock().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl EventSourcePort for LocalEventHub {
    async fn listen(
        &self,
        channel: &'static str,
        handler: EventHandler,
    ) -> Result<Subscription, ListenError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .lock()
            .entry(channel.to_string())
            .or_default()
            .push((id, handler));

        let weak: Weak<HubInner> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(channel, move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(channel, id);
            }
        }))
    }
}
