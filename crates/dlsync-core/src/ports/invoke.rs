//! Raw command invocation port.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::BackendResult;

/// Request/response boundary to the native backend.
///
/// Implementations forward `command` with its JSON `args` and return the
/// backend's JSON result. Backend-reported failures map to
/// [`BackendError::Rejected`](crate::BackendError::Rejected) with the message
/// untouched.
#[async_trait]
pub trait InvokePort: Send + Sync {
    /// Whether the backend is reachable at all.
    ///
    /// Checked before every action; `false` turns actions into no-ops.
    fn is_available(&self) -> bool;

    /// Invoke `command` and await its result.
    async fn invoke(&self, command: &str, args: Value) -> BackendResult<Value>;
}
