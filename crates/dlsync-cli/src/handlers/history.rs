//! History command handler.

use anyhow::Result;
use chrono::Local;
use dlsync_core::utils::{format_bytes, format_speed};
use dlsync_core::{HistoryRecord, HistoryStats};

use crate::bootstrap::CliContext;
use crate::presentation::{format_optional, print_separator, state_label, truncate_string};

/// What the history command should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// Show the most recent records.
    Show,
    /// Show records matching a query.
    Search(String),
    /// Delete records, optionally only those older than N days.
    Clear { older_than: Option<u32> },
}

/// Execute the history command.
///
/// # Errors
///
/// Returns the backend's message if clearing fails. Reads never fail.
pub async fn execute(ctx: &CliContext, action: HistoryAction) -> Result<()> {
    let client = ctx.client();

    match action {
        HistoryAction::Show => {
            client.mount().await;
            print_records(&client.history());
            if let Some(stats) = client.history_stats() {
                println!();
                println!("{}", stats_line(&stats));
            }
        }
        HistoryAction::Search(query) => {
            let records = client.search_history(&query).await;
            if records.is_empty() {
                println!("No history records match '{query}'.");
            } else {
                print_records(&records);
            }
        }
        HistoryAction::Clear { older_than } => {
            let cleared = ctx.live_client()?.clear_history(older_than).await?;
            match older_than {
                Some(days) => println!("Removed {cleared} record(s) older than {days} day(s)"),
                None => println!("Removed {cleared} record(s)"),
            }
        }
    }
    Ok(())
}

fn print_records(records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("No download history yet.");
        return;
    }

    println!(
        "{:<17} {:<10} {:<32} {:>10} {:>12}",
        "Finished", "Status", "Name", "Size", "Avg speed"
    );
    print_separator(85);
    for record in records {
        let finished = record
            .completed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M");
        let size = (record.total_bytes > 0).then(|| format_bytes(record.total_bytes));
        println!(
            "{:<17} {:<10} {:<32} {:>10} {:>12}",
            finished,
            state_label(record.status),
            truncate_string(&record.name, 32),
            format_optional(size, "--"),
            format_speed(record.average_speed)
        );
        if let Some(error) = &record.error {
            println!("{:<17} {error}", "");
        }
    }
}

fn stats_line(stats: &HistoryStats) -> String {
    format!(
        "{} record(s): {} completed, {} failed, {} cancelled | {} total",
        stats.total_count,
        stats.completed_count,
        stats.failed_count,
        stats.cancelled_count,
        format_bytes(stats.total_bytes)
    )
}
