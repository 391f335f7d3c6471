//! JSON-file settings repository.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dlsync_core::ClientSettings;
use dlsync_core::ports::{RepositoryError, SettingsRepository};
use tokio::fs;
use tracing::debug;

const APP_DIR: &str = "dlsync";
const FILE_NAME: &str = "settings.json";

/// Stores [`ClientSettings`] as pretty-printed JSON in a single file.
///
/// A missing file loads as defaults. Saves go through a sibling temp file
/// and a rename so a crash never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/dlsync/settings.json`, falling back to the working
    /// directory when the platform has no data dir.
    #[must_use]
    pub fn in_data_dir() -> Self {
        let dir = dirs::data_dir()
            .map(|p| p.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR));
        Self::new(dir.join(FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<ClientSettings, RepositoryError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                return Ok(ClientSettings::default());
            }
            Err(e) => return Err(RepositoryError::Storage(e.to_string())),
        };
        serde_json::from_str(&json).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn save(&self, settings: &ClientSettings) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RepositoryError::Storage(e.to_string()))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))
    }
}
