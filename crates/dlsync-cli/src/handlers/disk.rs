//! Disk space handler.

use anyhow::Result;
use dlsync_core::utils::format_bytes;

use crate::bootstrap::CliContext;

/// Show free space at `path`, and whether `required` bytes would fit.
///
/// # Errors
///
/// Returns the backend's message if the path cannot be inspected.
pub async fn execute(ctx: &CliContext, path: &str, required: Option<u64>) -> Result<()> {
    let client = ctx.client();
    let space = client.get_disk_space(path).await?;
    println!(
        "{}: {} free of {} ({} used)",
        space.path,
        format_bytes(space.available_bytes),
        format_bytes(space.total_bytes),
        format_bytes(space.used_bytes)
    );

    if let Some(required) = required {
        let fits = client.check_disk_space(path, required).await?;
        let verdict = if fits { "fits" } else { "does NOT fit" };
        println!("{} {verdict}", format_bytes(required));
    }
    Ok(())
}
