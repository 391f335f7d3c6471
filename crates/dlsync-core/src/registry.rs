//! Process-wide activity registry.
//!
//! Each mounted client registers under a source id and reports whether it
//! currently mirrors an in-flight download. Other parts of the process (a
//! tray icon, a quit confirmation) ask [`any_active`] synchronously without
//! holding a reference to any client.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static REGISTRY: LazyLock<Mutex<HashMap<String, bool>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock() -> MutexGuard<'static, HashMap<String, bool>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// RAII registration. Dropping it removes the source.
#[derive(Debug)]
pub struct Registration {
    source: String,
}

impl Registration {
    /// Update this source's activity flag.
    pub fn set_active(&self, active: bool) {
        lock().insert(self.source.clone(), active);
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        lock().remove(&self.source);
    }
}

/// Register `source` as inactive.
///
/// Registering an id that is already present resets its flag; the newest
/// registration owns the entry.
pub fn register(source: impl Into<String>) -> Registration {
    let source = source.into();
    lock().insert(source.clone(), false);
    Registration { source }
}

/// Whether `source` is registered and active.
#[must_use]
pub fn is_active(source: &str) -> bool {
    lock().get(source).copied().unwrap_or(false)
}

/// Whether any registered source is active.
#[must_use]
pub fn any_active() -> bool {
    lock().values().any(|active| *active)
}

/// Currently registered source ids, sorted.
#[must_use]
pub fn registered_sources() -> Vec<String> {
    let mut sources: Vec<String> = lock().keys().cloned().collect();
    sources.sort();
    sources
}
