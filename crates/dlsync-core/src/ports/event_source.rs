//! Named-channel event subscription port.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;

use super::ListenError;

/// Callback invoked with each raw payload published on a channel.
///
/// Handlers return a future so effects that need the backend (refreshes)
/// can await it without spawning.
pub type EventHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handle to an active channel subscription.
///
/// Releasing stops delivery. The release callback runs at most once: either
/// through [`Subscription::release`] or when the handle is dropped.
pub struct Subscription {
    channel: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(channel: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            channel: channel.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Channel this subscription listens on.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Stop delivery now.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Source of backend push events.
#[async_trait]
pub trait EventSourcePort: Send + Sync {
    /// Register `handler` on `channel`.
    ///
    /// Delivery continues until the returned [`Subscription`] is released.
    async fn listen(
        &self,
        channel: &'static str,
        handler: EventHandler,
    ) -> Result<Subscription, ListenError>;
}
