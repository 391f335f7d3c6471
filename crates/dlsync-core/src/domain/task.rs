//! Download task model and its lifecycle state machine.
//!
//! Pure data types with no I/O dependencies. The backend owns every state
//! transition; the client only mirrors what it is told, so the transition
//! table here is used to flag surprises, never to reject them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::utils::format::{format_bytes, format_eta, format_speed};

/// Backend-assigned identifier of a download task.
///
/// Opaque to the client and stable for the lifetime of the task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap a backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a download task.
///
/// ```text
/// queued --(started)--> downloading
/// downloading --(progress)--> downloading
/// downloading --(paused)--> paused
/// paused --(resumed)--> queued
/// downloading --(completed)--> completed   [terminal]
/// downloading --(failed)--> failed         [terminal]
/// queued|downloading|paused --(cancelled)--> cancelled  [terminal]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Waiting for a download slot.
    Queued,
    /// Transfer in progress.
    Downloading,
    /// Suspended by the user.
    Paused,
    /// Cancelled by the user.
    Cancelled,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl TaskState {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the task has reached an end state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether the task still occupies (or waits for) a download slot.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Queued | Self::Downloading)
    }

    /// Whether `next` is an edge of the lifecycle graph.
    ///
    /// Re-delivery of the current state is always accepted.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Queued, Self::Queued | Self::Downloading | Self::Cancelled)
            | (
                Self::Downloading,
                Self::Downloading | Self::Paused | Self::Completed | Self::Failed | Self::Cancelled,
            )
            | (Self::Paused, Self::Paused | Self::Queued | Self::Cancelled)
            | (Self::Completed, Self::Completed)
            | (Self::Failed, Self::Failed)
            | (Self::Cancelled, Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress snapshot of a task.
///
/// Snapshots from the backend are always complete, so the store replaces
/// this struct wholesale instead of merging it field by field. Missing
/// fields deserialize to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskProgress {
    /// Bytes written so far.
    pub downloaded_bytes: u64,
    /// Content length, unknown until the backend has seen the response headers.
    pub total_bytes: Option<u64>,
    /// Current transfer rate in bytes per second.
    pub speed: f64,
    /// Completion percentage (0.0 - 100.0).
    pub percent: f64,
    /// Estimated seconds remaining.
    pub eta_secs: Option<u64>,
    /// Human-readable mirror of `downloaded_bytes`.
    pub downloaded_human: String,
    /// Human-readable mirror of `total_bytes`.
    pub total_human: Option<String>,
    /// Human-readable mirror of `speed`.
    pub speed_human: String,
    /// Human-readable mirror of `eta_secs`.
    pub eta_human: Option<String>,
}

impl TaskProgress {
    /// Build a snapshot from raw counters, deriving percent, ETA and the
    /// human-readable mirrors.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(downloaded_bytes: u64, total_bytes: Option<u64>, speed: f64) -> Self {
        let percent = match total_bytes {
            Some(total) if total > 0 => (downloaded_bytes as f64 / total as f64) * 100.0,
            _ => 0.0,
        };

        let eta_secs = match total_bytes {
            Some(total) if speed > 0.0 && total > downloaded_bytes => {
                Some(((total - downloaded_bytes) as f64 / speed).ceil() as u64)
            }
            _ => None,
        };

        Self {
            downloaded_bytes,
            total_bytes,
            speed,
            percent,
            eta_secs,
            downloaded_human: format_bytes(downloaded_bytes),
            total_human: total_bytes.map(format_bytes),
            speed_human: format_speed(speed),
            eta_human: eta_secs.map(format_eta),
        }
    }
}

/// A queued, active or finished transfer as mirrored by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTask {
    /// Backend-assigned identifier.
    pub id: TaskId,
    /// Source URL.
    pub url: String,
    /// Target directory or file path.
    pub destination: String,
    /// Display name (usually the file name).
    pub name: String,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Latest progress snapshot.
    #[serde(default)]
    pub progress: TaskProgress,
    /// Failure description, only set while `state == failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the backend created the task.
    pub created_at: DateTime<Utc>,
    /// First transition to `downloading`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Set on any terminal transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DownloadTask {
    /// Create a freshly queued task.
    pub fn new(
        id: impl Into<TaskId>,
        url: impl Into<String>,
        destination: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            destination: destination.into(),
            name: name.into(),
            state: TaskState::Queued,
            progress: TaskProgress::default(),
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Move to `next`, maintaining the timestamp and error invariants.
    ///
    /// Returns `false` when the edge is not part of the lifecycle graph. The
    /// transition is applied either way.
    pub fn transition_to(&mut self, next: TaskState, now: DateTime<Utc>) -> bool {
        let expected = self.state.can_transition_to(next);

        if next == TaskState::Downloading && self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if next.is_terminal() {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }

        if next != TaskState::Failed {
            self.error = None;
        }

        self.state = next;
        expected
    }

    /// Apply a merge-patch. Returns `false` if the patch carried an
    /// unexpected state transition.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> bool {
        let mut expected = true;
        if let Some(next) = patch.state {
            expected = self.transition_to(next, now);
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(error) = patch.error {
            if self.state == TaskState::Failed {
                self.error = error;
            }
        }
        expected
    }

    /// Restore the timestamp and error invariants on a snapshot received
    /// from the backend.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if self.state.is_terminal() {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
        if self.state != TaskState::Failed {
            self.error = None;
        }
    }
}

/// Merge-patch for [`DownloadTask`].
///
/// `None` leaves a field untouched. For `error`, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPatch {
    /// New lifecycle state; timestamps follow it.
    pub state: Option<TaskState>,
    /// Replacement progress snapshot.
    pub progress: Option<TaskProgress>,
    /// Only applied while the task is `failed`.
    pub error: Option<Option<String>>,
}

impl TaskPatch {
    /// Patch that only changes the state.
    #[must_use]
    pub const fn state(state: TaskState) -> Self {
        Self {
            state: Some(state),
            progress: None,
            error: None,
        }
    }

    /// Patch that marks the task failed with `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            state: Some(TaskState::Failed),
            progress: None,
            error: Some(Some(error.into())),
        }
    }
}
