//! Backend event bridge.
//!
//! Subscribes to the nine backend channels and routes every payload into
//! [`QueueSync::apply_event`]. The channel list is [`EventKind::ALL`], so
//! setup and teardown iterate one table and a new channel cannot be
//! subscribed without also being released.

use std::sync::Arc;

use dlsync_core::EventKind;
use dlsync_core::ports::{EventHandler, EventSourcePort, Subscription};
use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::sync::QueueSync;

/// Owns the channel subscriptions for one mount.
pub struct EventBridge {
    source: Arc<dyn EventSourcePort>,
    sync: QueueSync,
    subscriptions: Vec<Subscription>,
    mounted: bool,
}

impl EventBridge {
    pub fn new(source: Arc<dyn EventSourcePort>, sync: QueueSync) -> Self {
        Self {
            source,
            sync,
            subscriptions: Vec::new(),
            mounted: false,
        }
    }

    /// Subscribe to every channel. Returns the number of live subscriptions.
    ///
    /// Calling this while mounted does nothing. If a subscription fails,
    /// the remaining channels are skipped and the ones already established
    /// stay live until [`unmount`](Self::unmount); the client then depends
    /// on manual refreshes for the missing channels.
    pub async fn mount(&mut self) -> usize {
        if self.mounted {
            return self.subscriptions.len();
        }
        self.mounted = true;

        for kind in EventKind::ALL {
            let channel = kind.channel();
            match self.source.listen(channel, self.handler_for(kind)).await {
                Ok(subscription) => self.subscriptions.push(subscription),
                Err(e) => {
                    warn!(
                        channel,
                        error = %e,
                        established = self.subscriptions.len(),
                        "Failed to subscribe to download events, continuing with partial coverage"
                    );
                    break;
                }
            }
        }

        debug!(
            count = self.subscriptions.len(),
            "Download event bridge mounted"
        );
        self.subscriptions.len()
    }

    /// Release every captured subscription exactly once.
    ///
    /// Returns how many were released.
    pub fn unmount(&mut self) -> usize {
        let released = self.subscriptions.len();
        for subscription in self.subscriptions.drain(..) {
            subscription.release();
        }
        if self.mounted {
            debug!(released, "Download event bridge unmounted");
        }
        self.mounted = false;
        released
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn handler_for(&self, kind: EventKind) -> EventHandler {
        let sync = self.sync.clone();
        Arc::new(move |payload: Value| {
            let sync = sync.clone();
            async move {
                match kind.decode(payload) {
                    Ok(event) => sync.apply_event(event).await,
                    Err(e) => warn!(
                        channel = kind.channel(),
                        error = %e,
                        "Ignoring malformed event payload"
                    ),
                }
            }
            .boxed()
        })
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.unmount();
    }
}
