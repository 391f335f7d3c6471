use serde::{Deserialize, Serialize};

/// Free-space report for the volume holding `path`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpace {
    pub path: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
}

impl DiskSpace {
    /// Whether `required` bytes fit in the available space.
    #[must_use]
    pub const fn fits(&self, required: u64) -> bool {
        required <= self.available_bytes
    }
}
