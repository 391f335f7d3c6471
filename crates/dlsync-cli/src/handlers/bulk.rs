//! Queue-wide command handlers.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Operation applied to every matching task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    PauseAll,
    ResumeAll,
    CancelAll,
    ClearFinished,
    RetryFailed,
}

impl BulkAction {
    const fn verb(self) -> &'static str {
        match self {
            Self::PauseAll => "paused",
            Self::ResumeAll => "resumed",
            Self::CancelAll => "cancelled",
            Self::ClearFinished => "cleared",
            Self::RetryFailed => "requeued",
        }
    }
}

/// Run `action` and report how many tasks the backend touched.
///
/// # Errors
///
/// Returns the backend's message on failure.
pub async fn execute(ctx: &CliContext, action: BulkAction) -> Result<()> {
    let client = ctx.live_client()?;
    let count = match action {
        BulkAction::PauseAll => client.pause_all().await?,
        BulkAction::ResumeAll => client.resume_all().await?,
        BulkAction::CancelAll => client.cancel_all().await?,
        BulkAction::ClearFinished => client.clear_finished().await?,
        BulkAction::RetryFailed => client.retry_failed().await?,
    };

    println!("{count} task(s) {}", action.verb());
    Ok(())
}
