//! DownloadQueueClient - the download queue orchestration facade.
//!
//! This is the main entry point for a UI. It owns the store, mounts the
//! event bridge, hydrates the initial state and delegates every action to
//! the ops handlers.

use std::sync::atomic::{AtomicU64, Ordering};

use dlsync_core::{
    ClientSettings, DiskSpace, DownloadRequest, DownloadStore, DownloadTask, HistoryRecord,
    HistoryStats, QueueStats, TaskId, registry,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::bridge::EventBridge;
use crate::deps::ClientDeps;
use crate::error::ClientResult;
use crate::ops::{DiskOps, DownloadOps, HistoryOps, SettingsOps};
use crate::sync::QueueSync;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Download queue client facade.
///
/// # Construction
///
/// ```ignore
/// let client = DownloadQueueClient::new(deps).await;
/// client.mount().await;
/// let id = client.add_download(DownloadRequest::new(url, dest)).await?;
/// ```
pub struct DownloadQueueClient {
    deps: ClientDeps,
    sync: QueueSync,
    bridge: Mutex<EventBridge>,
    source_id: String,
}

impl DownloadQueueClient {
    /// Create a client, restoring persisted settings.
    ///
    /// A settings load failure is logged and falls back to defaults.
    pub async fn new(deps: ClientDeps) -> Self {
        let settings = match deps.settings.load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to load client settings, using defaults");
                ClientSettings::default()
            }
        };

        let store = DownloadStore::with_settings(settings);
        let sync = QueueSync::new(deps.commands.clone(), store);
        let bridge = EventBridge::new(deps.events.clone(), sync.clone());
        let source_id = format!(
            "download-queue-{}",
            NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed)
        );

        Self {
            deps,
            sync,
            bridge: Mutex::new(bridge),
            source_id,
        }
    }

    fn download_ops(&self) -> DownloadOps<'_> {
        DownloadOps::new(&self.sync)
    }

    fn history_ops(&self) -> HistoryOps<'_> {
        HistoryOps::new(&self.sync)
    }

    fn settings_ops(&self) -> SettingsOps<'_> {
        SettingsOps::new(&self.sync, &self.deps.settings)
    }

    fn disk_ops(&self) -> DiskOps<'_> {
        DiskOps::new(&self.deps.commands)
    }

    /// The shared store. Clone it to observe changes from elsewhere.
    #[must_use]
    pub const fn store(&self) -> &DownloadStore {
        self.sync.store()
    }

    /// Id this client registers under in the activity registry.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.sync.is_available()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Subscribe to backend events and load the initial state.
    ///
    /// Returns the number of live subscriptions. Without a backend nothing
    /// is subscribed or fetched. Mounting twice is a no-op.
    pub async fn mount(&self) -> usize {
        if !self.is_available() {
            debug!("Download backend unavailable, skipping mount");
            return 0;
        }

        let mut bridge = self.bridge.lock().await;
        if bridge.is_mounted() {
            return bridge.subscription_count();
        }

        self.sync
            .attach_activity(registry::register(&self.source_id));
        let subscribed = bridge.mount().await;
        drop(bridge);

        self.sync.hydrate().await;
        info!(
            source = %self.source_id,
            subscriptions = subscribed,
            tasks = self.store().tasks().len(),
            "Download queue client mounted"
        );
        subscribed
    }

    /// Release every subscription and leave the activity registry.
    pub async fn unmount(&self) -> usize {
        let released = self.bridge.lock().await.unmount();
        self.sync.detach_activity();
        released
    }

    pub async fn is_mounted(&self) -> bool {
        self.bridge.lock().await.is_mounted()
    }

    // =========================================================================
    // State passthrough
    // =========================================================================

    #[must_use]
    pub fn tasks(&self) -> Vec<DownloadTask> {
        self.store().tasks()
    }

    #[must_use]
    pub fn stats(&self) -> Option<QueueStats> {
        self.store().stats()
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.store().history()
    }

    #[must_use]
    pub fn history_stats(&self) -> Option<HistoryStats> {
        self.store().history_stats()
    }

    #[must_use]
    pub fn speed_limit(&self) -> u64 {
        self.store().speed_limit()
    }

    #[must_use]
    pub fn max_concurrent(&self) -> u32 {
        self.store().max_concurrent()
    }

    #[must_use]
    pub fn show_history(&self) -> bool {
        self.store().show_history()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<TaskId> {
        self.store().selected_ids()
    }

    #[must_use]
    pub fn active(&self) -> Vec<DownloadTask> {
        self.store().active()
    }

    #[must_use]
    pub fn paused(&self) -> Vec<DownloadTask> {
        self.store().paused()
    }

    #[must_use]
    pub fn completed(&self) -> Vec<DownloadTask> {
        self.store().completed()
    }

    #[must_use]
    pub fn failed(&self) -> Vec<DownloadTask> {
        self.store().failed()
    }

    // =========================================================================
    // Download actions
    // =========================================================================

    pub async fn add_download(&self, request: DownloadRequest) -> ClientResult<TaskId> {
        self.download_ops().add(&request).await
    }

    pub async fn get_download(&self, id: &TaskId) -> ClientResult<DownloadTask> {
        self.download_ops().get(id).await
    }

    pub async fn pause_download(&self, id: &TaskId) -> ClientResult<()> {
        self.download_ops().pause(id).await
    }

    pub async fn resume_download(&self, id: &TaskId) -> ClientResult<()> {
        self.download_ops().resume(id).await
    }

    pub async fn cancel_download(&self, id: &TaskId) -> ClientResult<()> {
        self.download_ops().cancel(id).await
    }

    pub async fn remove_download(&self, id: &TaskId) -> ClientResult<bool> {
        self.download_ops().remove(id).await
    }

    pub async fn pause_all(&self) -> ClientResult<u32> {
        self.download_ops().pause_all().await
    }

    pub async fn resume_all(&self) -> ClientResult<u32> {
        self.download_ops().resume_all().await
    }

    pub async fn cancel_all(&self) -> ClientResult<u32> {
        self.download_ops().cancel_all().await
    }

    pub async fn clear_finished(&self) -> ClientResult<u32> {
        self.download_ops().clear_finished().await
    }

    pub async fn retry_failed(&self) -> ClientResult<u32> {
        self.download_ops().retry_failed().await
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select(&self, id: &TaskId) -> bool {
        self.store().select(id)
    }

    pub fn deselect(&self, id: &TaskId) -> bool {
        self.store().deselect(id)
    }

    pub fn toggle_selection(&self, id: &TaskId) -> bool {
        self.store().toggle_selection(id)
    }

    pub fn select_all(&self) {
        self.store().select_all();
    }

    pub fn clear_selection(&self) {
        self.store().clear_selection();
    }

    pub async fn pause_selected(&self) -> u32 {
        self.download_ops().pause_selected().await
    }

    pub async fn resume_selected(&self) -> u32 {
        self.download_ops().resume_selected().await
    }

    pub async fn cancel_selected(&self) -> u32 {
        self.download_ops().cancel_selected().await
    }

    pub async fn remove_selected(&self) -> u32 {
        self.download_ops().remove_selected().await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn set_speed_limit(&self, bytes_per_sec: u64) -> ClientResult<()> {
        self.settings_ops().set_speed_limit(bytes_per_sec).await
    }

    pub async fn set_max_concurrent(&self, max: u32) -> ClientResult<()> {
        self.settings_ops().set_max_concurrent(max).await
    }

    pub async fn set_show_history(&self, show: bool) {
        self.settings_ops().set_show_history(show).await;
    }

    // =========================================================================
    // Refreshes
    // =========================================================================

    pub async fn refresh_tasks(&self) {
        self.sync.refresh_tasks().await;
    }

    pub async fn refresh_stats(&self) {
        self.sync.refresh_stats().await;
    }

    pub async fn refresh_history(&self) {
        self.sync.refresh_history().await;
    }

    pub async fn refresh_history_stats(&self) {
        self.sync.refresh_history_stats().await;
    }

    pub async fn refresh_speed_limit(&self) {
        self.sync.refresh_speed_limit().await;
    }

    // =========================================================================
    // History
    // =========================================================================

    pub async fn search_history(&self, query: &str) -> Vec<HistoryRecord> {
        self.history_ops().search(query).await
    }

    pub async fn clear_history(&self, days: Option<u32>) -> ClientResult<u32> {
        self.history_ops().clear(days).await
    }

    pub async fn remove_history_record(&self, id: &str) -> ClientResult<bool> {
        self.history_ops().remove(id).await
    }

    // =========================================================================
    // Disk
    // =========================================================================

    pub async fn get_disk_space(&self, path: &str) -> ClientResult<DiskSpace> {
        self.disk_ops().space(path).await
    }

    pub async fn check_disk_space(&self, path: &str, required_bytes: u64) -> ClientResult<bool> {
        self.disk_ops().check(path, required_bytes).await
    }
}

impl Drop for DownloadQueueClient {
    fn drop(&mut self) {
        self.bridge.get_mut().unmount();
        self.sync.detach_activity();
    }
}
