//! Per-task control handlers: pause, resume, cancel and remove.

use anyhow::Result;
use dlsync_client::TaskId;

use crate::bootstrap::CliContext;

/// Action applied to a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Pause,
    Resume,
    Cancel,
    Remove,
}

impl TaskAction {
    const fn past_tense(self) -> &'static str {
        match self {
            Self::Pause => "Paused",
            Self::Resume => "Resumed",
            Self::Cancel => "Cancelled",
            Self::Remove => "Removed",
        }
    }
}

/// Apply `action` to the task with `id`.
///
/// # Errors
///
/// Returns the backend's message if the task is unknown or the transition
/// is refused.
pub async fn execute(ctx: &CliContext, action: TaskAction, id: &str) -> Result<()> {
    let client = ctx.live_client()?;
    let id = TaskId::from(id);

    match action {
        TaskAction::Pause => client.pause_download(&id).await?,
        TaskAction::Resume => client.resume_download(&id).await?,
        TaskAction::Cancel => client.cancel_download(&id).await?,
        TaskAction::Remove => {
            if !client.remove_download(&id).await? {
                println!("Task {id} was not in the queue");
                return Ok(());
            }
        }
    }

    println!("{} task {id}", action.past_tense());
    Ok(())
}
