//! Client-persisted settings.
//!
//! Only three values survive a restart: the speed limit, the concurrency
//! cap and whether the history panel is shown. Everything else is
//! re-hydrated from the backend. No validation happens here; the backend
//! is authoritative for what values it accepts.

use serde::{Deserialize, Serialize};

/// Default number of simultaneous transfers.
pub const DEFAULT_MAX_CONCURRENT: u32 = 3;

/// Persisted client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Global speed limit in bytes per second (0 = unlimited).
    pub speed_limit: u64,

    /// Maximum simultaneous transfers.
    pub max_concurrent: u32,

    /// Whether finished downloads are listed.
    pub show_history: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            speed_limit: 0,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            show_history: true,
        }
    }
}
