//! Watch command handler.
//!
//! Mounts the client and prints the active tasks every time the store
//! changes, until Ctrl-C.

use anyhow::Result;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::presentation::{progress_cell, queue_summary, truncate_string};

/// Follow the queue live.
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let client = ctx.client();
    let mut changes = client.store().subscribe();

    let listeners = client.mount().await;
    debug!(listeners, "Watching download queue");
    render(ctx);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                render(ctx);
            }
            signal = &mut ctrl_c => {
                signal?;
                println!();
                break;
            }
        }
    }
    Ok(())
}

fn render(ctx: &CliContext) {
    let client = ctx.client();
    let revision = client.store().revision();

    match client.stats() {
        Some(stats) => println!("[{revision}] {}", queue_summary(&stats)),
        None => println!("[{revision}] {} task(s)", client.tasks().len()),
    }
    for task in client.active() {
        println!(
            "    {:<32} {}",
            truncate_string(&task.name, 32),
            progress_cell(&task)
        );
    }
}
