//! Backend push events.
//!
//! The backend publishes nine fire-and-forget events, each on its own named
//! channel. Channel names are part of the wire contract and must never change.
//!
//! # Wire Format
//!
//! Payloads are flat JSON objects keyed by `task_id` (or `stats` for the
//! queue summary):
//!
//! ```json
//! { "task_id": "7f3c", "progress": { "downloadedBytes": 1024, "totalBytes": 4096 } }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{QueueStats, TaskId, TaskProgress};

/// Stable channel names.
pub mod channels {
    pub const TASK_ADDED: &str = "download-task-added";
    pub const TASK_STARTED: &str = "download-task-started";
    pub const TASK_PROGRESS: &str = "download-task-progress";
    pub const TASK_COMPLETED: &str = "download-task-completed";
    pub const TASK_FAILED: &str = "download-task-failed";
    pub const TASK_PAUSED: &str = "download-task-paused";
    pub const TASK_RESUMED: &str = "download-task-resumed";
    pub const TASK_CANCELLED: &str = "download-task-cancelled";
    pub const QUEUE_UPDATED: &str = "download-queue-updated";
}

/// Discriminant of a backend event, one per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskAdded,
    TaskStarted,
    TaskProgress,
    TaskCompleted,
    TaskFailed,
    TaskPaused,
    TaskResumed,
    TaskCancelled,
    QueueUpdated,
}

impl EventKind {
    /// Every event kind, in subscription order.
    pub const ALL: [Self; 9] = [
        Self::TaskAdded,
        Self::TaskStarted,
        Self::TaskProgress,
        Self::TaskCompleted,
        Self::TaskFailed,
        Self::TaskPaused,
        Self::TaskResumed,
        Self::TaskCancelled,
        Self::QueueUpdated,
    ];

    /// Wire channel this kind is published on.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::TaskAdded => channels::TASK_ADDED,
            Self::TaskStarted => channels::TASK_STARTED,
            Self::TaskProgress => channels::TASK_PROGRESS,
            Self::TaskCompleted => channels::TASK_COMPLETED,
            Self::TaskFailed => channels::TASK_FAILED,
            Self::TaskPaused => channels::TASK_PAUSED,
            Self::TaskResumed => channels::TASK_RESUMED,
            Self::TaskCancelled => channels::TASK_CANCELLED,
            Self::QueueUpdated => channels::QUEUE_UPDATED,
        }
    }

    /// Reverse lookup from a channel name.
    #[must_use]
    pub fn from_channel(channel: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.channel() == channel)
    }

    /// Decode a raw channel payload into a typed event.
    pub fn decode(self, payload: Value) -> Result<BackendEvent, serde_json::Error> {
        Ok(match self {
            Self::TaskAdded => BackendEvent::TaskAdded {
                task_id: task_id(payload)?,
            },
            Self::TaskStarted => BackendEvent::TaskStarted {
                task_id: task_id(payload)?,
            },
            Self::TaskProgress => {
                let p: ProgressPayload = serde_json::from_value(payload)?;
                BackendEvent::TaskProgress {
                    task_id: p.task_id,
                    progress: p.progress,
                }
            }
            Self::TaskCompleted => BackendEvent::TaskCompleted {
                task_id: task_id(payload)?,
            },
            Self::TaskFailed => {
                let p: FailedPayload = serde_json::from_value(payload)?;
                BackendEvent::TaskFailed {
                    task_id: p.task_id,
                    error: p.error,
                }
            }
            Self::TaskPaused => BackendEvent::TaskPaused {
                task_id: task_id(payload)?,
            },
            Self::TaskResumed => BackendEvent::TaskResumed {
                task_id: task_id(payload)?,
            },
            Self::TaskCancelled => BackendEvent::TaskCancelled {
                task_id: task_id(payload)?,
            },
            Self::QueueUpdated => {
                let p: StatsPayload = serde_json::from_value(payload)?;
                BackendEvent::QueueUpdated { stats: p.stats }
            }
        })
    }
}

#[derive(Deserialize)]
struct TaskPayload {
    #[serde(alias = "taskId")]
    task_id: TaskId,
}

#[derive(Deserialize)]
struct ProgressPayload {
    #[serde(alias = "taskId")]
    task_id: TaskId,
    progress: TaskProgress,
}

#[derive(Deserialize)]
struct FailedPayload {
    #[serde(alias = "taskId")]
    task_id: TaskId,
    #[serde(default)]
    error: String,
}

#[derive(Deserialize)]
struct StatsPayload {
    stats: QueueStats,
}

fn task_id(payload: Value) -> Result<TaskId, serde_json::Error> {
    serde_json::from_value::<TaskPayload>(payload).map(|p| p.task_id)
}

/// A decoded backend event.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendEvent {
    /// A task was created server-side; the payload carries only its id.
    TaskAdded { task_id: TaskId },
    TaskStarted { task_id: TaskId },
    TaskProgress {
        task_id: TaskId,
        progress: TaskProgress,
    },
    TaskCompleted { task_id: TaskId },
    TaskFailed { task_id: TaskId, error: String },
    TaskPaused { task_id: TaskId },
    /// Resumed tasks go back to the queue, not straight to downloading.
    TaskResumed { task_id: TaskId },
    TaskCancelled { task_id: TaskId },
    QueueUpdated { stats: QueueStats },
}

impl BackendEvent {
    /// Discriminant of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::TaskAdded { .. } => EventKind::TaskAdded,
            Self::TaskStarted { .. } => EventKind::TaskStarted,
            Self::TaskProgress { .. } => EventKind::TaskProgress,
            Self::TaskCompleted { .. } => EventKind::TaskCompleted,
            Self::TaskFailed { .. } => EventKind::TaskFailed,
            Self::TaskPaused { .. } => EventKind::TaskPaused,
            Self::TaskResumed { .. } => EventKind::TaskResumed,
            Self::TaskCancelled { .. } => EventKind::TaskCancelled,
            Self::QueueUpdated { .. } => EventKind::QueueUpdated,
        }
    }

    /// Wire channel for this event.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        self.kind().channel()
    }

    /// Task this event concerns, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::TaskAdded { task_id }
            | Self::TaskStarted { task_id }
            | Self::TaskProgress { task_id, .. }
            | Self::TaskCompleted { task_id }
            | Self::TaskFailed { task_id, .. }
            | Self::TaskPaused { task_id }
            | Self::TaskResumed { task_id }
            | Self::TaskCancelled { task_id } => Some(task_id),
            Self::QueueUpdated { .. } => None,
        }
    }

    /// Encode the wire payload, the inverse of [`EventKind::decode`].
    ///
    /// Used by in-process event sources and test doubles.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::TaskProgress { task_id, progress } => {
                serde_json::json!({ "task_id": task_id, "progress": progress })
            }
            Self::TaskFailed { task_id, error } => {
                serde_json::json!({ "task_id": task_id, "error": error })
            }
            Self::QueueUpdated { stats } => serde_json::json!({ "stats": stats }),
            Self::TaskAdded { task_id }
            | Self::TaskStarted { task_id }
            | Self::TaskCompleted { task_id }
            | Self::TaskPaused { task_id }
            | Self::TaskResumed { task_id }
            | Self::TaskCancelled { task_id } => serde_json::json!({ "task_id": task_id }),
        }
    }
}
