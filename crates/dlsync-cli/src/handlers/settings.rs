//! Speed limit and concurrency handlers.
//!
//! Both go to the backend first and are persisted locally only once the
//! backend accepts them.

use anyhow::Result;
use dlsync_core::utils::format_speed;

use crate::bootstrap::CliContext;

/// Set the global speed limit (0 = unlimited).
///
/// # Errors
///
/// Returns the backend's message on failure.
pub async fn speed_limit(ctx: &CliContext, bytes_per_sec: u64) -> Result<()> {
    ctx.live_client()?.set_speed_limit(bytes_per_sec).await?;
    if bytes_per_sec == 0 {
        println!("Speed limit removed");
    } else {
        #[allow(clippy::cast_precision_loss)]
        let limit = format_speed(bytes_per_sec as f64);
        println!("Speed limit set to {limit}");
    }
    Ok(())
}

/// Set how many downloads may run at once.
///
/// # Errors
///
/// Returns the backend's message on failure.
pub async fn max_concurrent(ctx: &CliContext, max: u32) -> Result<()> {
    ctx.live_client()?.set_max_concurrent(max).await?;
    println!("Up to {max} download(s) will run at once");
    Ok(())
}
