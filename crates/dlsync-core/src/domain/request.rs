//! Parameters for enqueuing a new download.

use serde::{Deserialize, Serialize};

/// A request to add a download to the backend queue.
///
/// The backend derives the display name from the URL when `name` is absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DownloadRequest {
    /// Create a request for `url` saved under `destination`.
    pub fn new(url: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            name: None,
        }
    }

    /// Override the display/file name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
