//! Task and history fixtures.

use chrono::{Duration, Utc};
use dlsync_core::{DownloadTask, HistoryRecord, QueueStats, TaskId, TaskState};

/// A task in `state` with consistent timestamps.
pub fn task(id: &str, state: TaskState) -> DownloadTask {
    let mut task = DownloadTask::new(
        id,
        format!("https://example.com/files/{id}.bin"),
        "/downloads",
        format!("{id}.bin"),
    );
    let now = Utc::now();
    if state != TaskState::Queued {
        task.transition_to(TaskState::Downloading, now);
    }
    task.transition_to(state, now);
    if state == TaskState::Failed {
        task.error = Some("connection reset".to_string());
    }
    task
}

pub fn queued(id: &str) -> DownloadTask {
    task(id, TaskState::Queued)
}

pub fn record(id: &str, status: TaskState) -> HistoryRecord {
    let completed_at = Utc::now();
    HistoryRecord {
        id: id.to_string(),
        task_id: TaskId::from(format!("task-{id}")),
        url: format!("https://example.com/files/{id}.bin"),
        destination: "/downloads".to_string(),
        name: format!("{id}.bin"),
        status,
        total_bytes: 4096,
        error: None,
        created_at: completed_at - Duration::seconds(30),
        completed_at,
        duration_secs: 30,
        average_speed: 136.5,
    }
}

pub fn stats(total: u32, downloading: u32) -> QueueStats {
    QueueStats {
        total_tasks: total,
        downloading,
        queued: total - downloading,
        ..QueueStats::default()
    }
}
