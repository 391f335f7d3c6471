//! Settings repository trait definition.
//!
//! This port defines the interface for client settings persistence.
//! Implementations handle all storage details internally.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::ClientSettings;

/// Repository for client settings persistence.
///
/// Works with the domain `ClientSettings` type directly; the implementation
/// handles serialization.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load client settings.
    ///
    /// Returns default settings if none are stored.
    async fn load(&self) -> Result<ClientSettings, RepositoryError>;

    /// Save client settings.
    async fn save(&self, settings: &ClientSettings) -> Result<(), RepositoryError>;
}

/// Process-local settings storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: Mutex<Option<ClientSettings>>,
}

impl InMemorySettingsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `settings` already stored.
    #[must_use]
    pub const fn with_settings(settings: ClientSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<ClientSettings, RepositoryError> {
        let guard = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, settings: &ClientSettings) -> Result<(), RepositoryError> {
        let mut guard = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(settings.clone());
        Ok(())
    }
}
