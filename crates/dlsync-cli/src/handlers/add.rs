//! Add command handler.

use anyhow::Result;
use dlsync_client::DownloadRequest;

use crate::bootstrap::CliContext;

/// Queue `url` for download into `dest`.
///
/// # Errors
///
/// Returns the backend's message if it refuses the request.
pub async fn execute(ctx: &CliContext, url: &str, dest: &str, name: Option<&str>) -> Result<()> {
    let mut request = DownloadRequest::new(url, dest);
    if let Some(name) = name {
        request = request.with_name(name);
    }

    let id = ctx.client().add_download(request).await?;
    println!("Queued {url} as task {id}");
    Ok(())
}
