//! Action surface of `DownloadQueueClient`.
//!
//! # What is tested
//!
//! - Task actions and which of them touch the store
//! - Write-through settings and their persistence
//! - Safe defaults when the backend is absent
//! - Error propagation for mutations, degradation for reads

mod common;

use std::sync::Arc;

use dlsync_client::{ClientDeps, ClientError, DownloadQueueClient, DownloadRequest, LocalEventHub};
use dlsync_core::ports::SettingsRepository;
use dlsync_core::{BackendError, ClientSettings, InMemorySettingsRepository, TaskId, TaskState};

use common::fake_backend::{DISK_AVAILABLE, FakeCommands};
use common::fixtures::{queued, record, task};
use common::harness;

fn id(raw: &str) -> TaskId {
    TaskId::from(raw)
}

// ── Hydration ──────────────────────────────────────────────────────

#[tokio::test]
async fn mount_hydrates_every_slice() {
    let backend = FakeCommands::with_tasks(vec![queued("task-1")]);
    backend.state().speed_limit = 2048;
    backend.push_history(record("h1", TaskState::Completed));

    let h = harness(backend).await;
    h.client.mount().await;

    assert_eq!(h.client.tasks().len(), 1);
    assert!(h.client.stats().is_some());
    assert_eq!(h.client.history().len(), 1);
    assert!(h.client.history_stats().is_some());
    assert_eq!(h.client.speed_limit(), 2048);
}

#[tokio::test]
async fn persisted_settings_are_restored() {
    let saved = ClientSettings {
        speed_limit: 1000,
        max_concurrent: 8,
        show_history: false,
    };
    let deps = ClientDeps::new(
        Arc::new(FakeCommands::unavailable()),
        Arc::new(LocalEventHub::new()),
        Arc::new(InMemorySettingsRepository::with_settings(saved)),
    );

    let client = DownloadQueueClient::new(deps).await;
    assert_eq!(client.speed_limit(), 1000);
    assert_eq!(client.max_concurrent(), 8);
    assert!(!client.show_history());
}

#[tokio::test]
async fn fresh_repository_starts_from_defaults() {
    let h = harness(FakeCommands::unavailable()).await;
    assert_eq!(h.client.speed_limit(), 0);
    assert_eq!(h.client.max_concurrent(), 3);
    assert!(h.client.show_history());
}

// ── Task actions ───────────────────────────────────────────────────

#[tokio::test]
async fn add_download_refreshes_without_waiting_for_event() {
    let h = harness(FakeCommands::new()).await;
    h.client.mount().await;

    let request = DownloadRequest::new("https://example.com/a.iso", "/downloads");
    let task_id = h.client.add_download(request).await.unwrap();

    let tasks = h.client.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].name, "a.iso");
    assert_eq!(
        h.backend.calls().last().map(String::as_str),
        Some("download_list")
    );
}

#[tokio::test]
async fn pause_resume_cancel_do_not_touch_the_store() {
    let h = harness(FakeCommands::with_tasks(vec![task("task-1", TaskState::Downloading)])).await;
    h.client.mount().await;
    let revision = h.client.store().revision();

    h.client.pause_download(&id("task-1")).await.unwrap();
    h.client.resume_download(&id("task-1")).await.unwrap();
    h.client.cancel_download(&id("task-1")).await.unwrap();

    assert_eq!(h.client.store().revision(), revision);
    assert_eq!(h.client.active().len(), 1);
    assert_eq!(h.backend.call_count("download_pause"), 1);
    assert_eq!(h.backend.call_count("download_resume"), 1);
    assert_eq!(h.backend.call_count("download_cancel"), 1);
}

#[tokio::test]
async fn remove_download_prunes_task_and_selection() {
    let h = harness(FakeCommands::with_tasks(vec![queued("task-1"), queued("task-2")])).await;
    h.client.mount().await;
    assert!(h.client.select(&id("task-1")));

    assert!(h.client.remove_download(&id("task-1")).await.unwrap());

    assert!(h.client.tasks().iter().all(|t| t.id.as_str() != "task-1"));
    assert!(!h.client.store().is_selected(&id("task-1")));
    assert!(h.client.selected_ids().is_empty());
}

#[tokio::test]
async fn remove_unknown_download_keeps_store() {
    let h = harness(FakeCommands::with_tasks(vec![queued("task-1")])).await;
    h.client.mount().await;
    // Present locally, already gone on the backend
    h.backend.state().tasks.clear();

    assert!(!h.client.remove_download(&id("task-1")).await.unwrap());
    assert_eq!(h.client.tasks().len(), 1);
}

#[tokio::test]
async fn get_download_passes_through() {
    let h = harness(FakeCommands::with_tasks(vec![queued("task-1")])).await;
    let task = h.client.get_download(&id("task-1")).await.unwrap();
    assert_eq!(task.id.as_str(), "task-1");

    let err = h.client.get_download(&id("nope")).await.unwrap_err();
    assert!(matches!(err, ClientError::Backend(BackendError::Rejected { .. })));
}

// ── Bulk actions ───────────────────────────────────────────────────

#[tokio::test]
async fn bulk_actions_return_backend_counts() {
    let h = harness(FakeCommands::with_tasks(vec![
        task("a", TaskState::Downloading),
        queued("b"),
        task("c", TaskState::Paused),
        task("d", TaskState::Failed),
    ]))
    .await;

    assert_eq!(h.client.pause_all().await.unwrap(), 2);
    assert_eq!(h.client.resume_all().await.unwrap(), 1);
    assert_eq!(h.client.cancel_all().await.unwrap(), 3);
    assert_eq!(h.client.retry_failed().await.unwrap(), 1);
}

#[tokio::test]
async fn clear_finished_refreshes_the_list() {
    let h = harness(FakeCommands::with_tasks(vec![
        task("a", TaskState::Completed),
        task("b", TaskState::Cancelled),
        queued("c"),
    ]))
    .await;
    h.client.mount().await;
    assert_eq!(h.client.tasks().len(), 3);

    assert_eq!(h.client.clear_finished().await.unwrap(), 2);
    let ids: Vec<_> = h.client.tasks().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![id("c")]);
}

#[tokio::test]
async fn selection_bulk_actions_count_accepted_ids() {
    let h = harness(FakeCommands::with_tasks(vec![queued("a"), queued("b"), queued("c")])).await;
    h.client.mount().await;
    h.client.select_all();
    h.backend.reject_id("b");

    assert_eq!(h.client.pause_selected().await, 2);
    assert_eq!(h.backend.call_count("download_pause"), 3);

    assert_eq!(h.client.remove_selected().await, 2);
    let remaining: Vec<_> = h.client.tasks().into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![id("b")]);
    assert_eq!(h.client.selected_ids(), vec![id("b")]);
}

// ── Settings ───────────────────────────────────────────────────────

#[tokio::test]
async fn set_speed_limit_writes_through_and_persists() {
    let h = harness(FakeCommands::new()).await;

    h.client.set_speed_limit(512).await.unwrap();

    assert_eq!(h.backend.state().speed_limit, 512);
    assert_eq!(h.client.speed_limit(), 512);
    assert_eq!(h.settings.load().await.unwrap().speed_limit, 512);
}

#[tokio::test]
async fn set_max_concurrent_writes_through_and_persists() {
    let h = harness(FakeCommands::new()).await;

    h.client.set_max_concurrent(5).await.unwrap();

    assert_eq!(h.backend.state().max_concurrent, 5);
    assert_eq!(h.client.max_concurrent(), 5);
    assert_eq!(h.settings.load().await.unwrap().max_concurrent, 5);
}

#[tokio::test]
async fn rejected_setting_leaves_store_unchanged() {
    let h = harness(FakeCommands::new()).await;
    h.backend.fail_all("limit out of range");

    let err = h.client.set_speed_limit(7).await.unwrap_err();
    assert_eq!(err.to_string(), "limit out of range");
    assert_eq!(h.client.speed_limit(), 0);
    assert_eq!(h.settings.load().await.unwrap().speed_limit, 0);
}

#[tokio::test]
async fn show_history_is_local_and_persisted() {
    let h = harness(FakeCommands::unavailable()).await;

    h.client.set_show_history(false).await;

    assert!(!h.client.show_history());
    assert!(!h.settings.load().await.unwrap().show_history);
    assert!(h.backend.calls().is_empty());
}

// ── History ────────────────────────────────────────────────────────

#[tokio::test]
async fn full_history_clear_empties_cache_and_stats() {
    let backend = FakeCommands::new();
    backend.push_history(record("h1", TaskState::Completed));
    backend.push_history(record("h2", TaskState::Failed));
    let h = harness(backend).await;
    h.client.mount().await;
    assert_eq!(h.client.history().len(), 2);

    assert_eq!(h.client.clear_history(None).await.unwrap(), 2);
    assert!(h.client.history().is_empty());
    assert_eq!(h.backend.call_count("download_history_stats"), 2);
}

#[tokio::test]
async fn partial_history_clear_reloads_cache() {
    let backend = FakeCommands::new();
    backend.push_history(record("h1", TaskState::Completed));
    let h = harness(backend).await;

    assert_eq!(h.client.clear_history(Some(30)).await.unwrap(), 0);
    assert_eq!(h.client.history().len(), 1);
    assert_eq!(h.backend.call_count("download_history_list"), 1);
}

#[tokio::test]
async fn remove_history_record_updates_cache() {
    let backend = FakeCommands::new();
    backend.push_history(record("h1", TaskState::Completed));
    backend.push_history(record("h2", TaskState::Completed));
    let h = harness(backend).await;
    h.client.mount().await;

    assert!(h.client.remove_history_record("h1").await.unwrap());
    let ids: Vec<_> = h.client.history().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["h2".to_string()]);
}

#[tokio::test]
async fn history_search_degrades_to_empty() {
    let backend = FakeCommands::new();
    backend.push_history(record("ubuntu", TaskState::Completed));
    let h = harness(backend).await;

    assert_eq!(h.client.search_history("ubuntu").await.len(), 1);

    h.backend.fail_all("index corrupted");
    assert!(h.client.search_history("ubuntu").await.is_empty());
}

// ── Disk ───────────────────────────────────────────────────────────

#[tokio::test]
async fn disk_queries_pass_through() {
    let h = harness(FakeCommands::new()).await;
    let revision = h.client.store().revision();

    let space = h.client.get_disk_space("/downloads").await.unwrap();
    assert_eq!(space.path, "/downloads");
    assert_eq!(space.available_bytes, DISK_AVAILABLE);
    assert!(h.client.check_disk_space("/downloads", 100).await.unwrap());
    let enough = h.client.check_disk_space("/downloads", 10_000).await;
    assert!(!enough.unwrap());
    assert_eq!(h.client.store().revision(), revision);
}

// ── Unavailable backend ────────────────────────────────────────────

#[tokio::test]
async fn refresh_without_backend_makes_no_call() {
    let h = harness(FakeCommands::unavailable()).await;
    h.client.mount().await;

    h.client.refresh_tasks().await;
    h.client.refresh_stats().await;
    h.client.refresh_history().await;

    assert!(h.backend.calls().is_empty());
    assert!(h.client.tasks().is_empty());
}

#[tokio::test]
async fn actions_without_backend_return_safe_defaults() {
    let h = harness(FakeCommands::unavailable()).await;
    let some_id = id("task-1");

    h.client.pause_download(&some_id).await.unwrap();
    assert!(!h.client.remove_download(&some_id).await.unwrap());
    assert_eq!(h.client.pause_all().await.unwrap(), 0);
    assert_eq!(h.client.clear_finished().await.unwrap(), 0);
    assert_eq!(h.client.clear_history(None).await.unwrap(), 0);
    assert!(h.client.search_history("x").await.is_empty());
    assert!(!h.client.check_disk_space("/", 1).await.unwrap());
    assert_eq!(h.client.pause_selected().await, 0);
    h.client.set_speed_limit(512).await.unwrap();
    assert_eq!(h.client.speed_limit(), 0);
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn actions_without_default_report_unavailable() {
    let h = harness(FakeCommands::unavailable()).await;

    let err = h
        .client
        .add_download(DownloadRequest::new("https://example.com/a", "/tmp"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { .. }));
    assert!(matches!(
        h.client.get_download(&id("x")).await,
        Err(ClientError::Unavailable { .. })
    ));
    assert!(matches!(
        h.client.get_disk_space("/").await,
        Err(ClientError::Unavailable { .. })
    ));
}

// ── Error propagation ──────────────────────────────────────────────

#[tokio::test]
async fn mutation_errors_propagate_verbatim() {
    let h = harness(FakeCommands::new()).await;
    h.backend.fail_all("queue is full");

    let err = h
        .client
        .add_download(DownloadRequest::new("https://example.com/a", "/tmp"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "queue is full");
    assert!(matches!(
        h.client.pause_all().await,
        Err(ClientError::Backend(BackendError::Rejected { .. }))
    ));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_state() {
    let h = harness(FakeCommands::with_tasks(vec![queued("task-1")])).await;
    h.client.mount().await;

    h.backend.fail_all("backend restarting");
    h.client.refresh_tasks().await;
    h.client.refresh_speed_limit().await;

    assert_eq!(h.client.tasks().len(), 1);
}
