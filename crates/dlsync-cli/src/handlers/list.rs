//! List command handler.

use anyhow::Result;
use dlsync_client::DownloadTask;

use crate::bootstrap::CliContext;
use crate::presentation::{
    print_separator, progress_cell, queue_summary, state_label, truncate_string,
};

/// Execute the list command.
///
/// Mounts the client so the store is hydrated, then prints every task in
/// backend order followed by the queue summary.
///
/// # Errors
///
/// Never fails once the backend is up; read failures show as an empty list.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let client = ctx.client();
    client.mount().await;

    let tasks = client.tasks();
    if tasks.is_empty() {
        println!("The download queue is empty.");
        println!("Use 'dlsync add <url> --dest <dir>' to queue a download.");
        return Ok(());
    }

    print_tasks(&tasks);
    if let Some(stats) = client.stats() {
        println!();
        println!("{}", queue_summary(&stats));
    }
    Ok(())
}

/// Print `tasks` as a table.
pub fn print_tasks(tasks: &[DownloadTask]) {
    println!("{:<14} {:<10} {:<32} Progress", "ID", "State", "Name");
    print_separator(100);
    for task in tasks {
        println!(
            "{:<14} {:<10} {:<32} {}",
            truncate_string(task.id.as_str(), 14),
            state_label(task.state),
            truncate_string(&task.name, 32),
            progress_cell(task)
        );
    }
}
