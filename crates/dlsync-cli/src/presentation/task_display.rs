//! Per-task and per-queue display strings.

use dlsync_core::utils::format::format_speed;
use dlsync_core::{DownloadTask, QueueStats, TaskState};

/// Short state label used in the task table.
#[must_use]
pub const fn state_label(state: TaskState) -> &'static str {
    match state {
        TaskState::Queued => "queued",
        TaskState::Downloading => "active",
        TaskState::Paused => "paused",
        TaskState::Completed => "done",
        TaskState::Failed => "FAILED",
        TaskState::Cancelled => "cancelled",
    }
}

/// Progress column: percent, bytes and speed/ETA while downloading.
#[must_use]
pub fn progress_cell(task: &DownloadTask) -> String {
    let progress = &task.progress;
    let size = progress.total_human.as_ref().map_or_else(
        || progress.downloaded_human.clone(),
        |total| format!("{} / {total}", progress.downloaded_human),
    );

    match task.state {
        TaskState::Downloading => {
            let eta = progress.eta_human.as_deref().unwrap_or("--");
            format!(
                "{:>5.1}%  {size}  {}  eta {eta}",
                progress.percent, progress.speed_human
            )
        }
        TaskState::Failed => task.error.clone().unwrap_or_default(),
        _ => format!("{:>5.1}%  {size}", progress.percent),
    }
}

/// One-line queue summary.
#[must_use]
pub fn queue_summary(stats: &QueueStats) -> String {
    format!(
        "{} task(s): {} downloading, {} queued, {} paused, {} completed, {} failed | {:.1}% at {}",
        stats.total_tasks,
        stats.downloading,
        stats.queued,
        stats.paused,
        stats.completed,
        stats.failed,
        stats.overall_progress,
        format_speed(stats.total_speed),
    )
}
