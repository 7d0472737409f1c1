// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aio_adapters::{FakeNotifyAdapter, FakePaneAdapter, FakeWorkspaceBackend};
use aio_core::FakeClock;
use std::path::Path;

type TestExecutor = Executor<FakeWorkspaceBackend, FakePaneAdapter, FakeNotifyAdapter, FakeClock>;

fn setup() -> (TestExecutor, FakeWorkspaceBackend, FakePaneAdapter, FakeNotifyAdapter) {
    let workspace = FakeWorkspaceBackend::new();
    let pane = FakePaneAdapter::new();
    let notify = FakeNotifyAdapter::new();
    let executor = Executor::new(workspace.clone(), pane.clone(), notify.clone(), FakeClock::new());
    (executor, workspace, pane, notify)
}

#[tokio::test]
async fn create_workspace_materializes_and_is_idempotent() {
    let (executor, workspace, _, _) = setup();

    let path = executor.create_workspace("w-1", "aio/t-1").await.unwrap();
    assert!(workspace.exists("w-1"));

    let again = executor.create_workspace("w-1", "aio/t-1").await.unwrap();
    assert_eq!(path, again);
}

#[tokio::test]
async fn open_worker_pane_exports_env_vars_into_the_pane() {
    let (executor, _, pane, _) = setup();

    let env = vec![("TASK_ID".to_string(), "t-1".to_string()), ("WORKER_ID".to_string(), "w-1".to_string())];
    let handle = executor.open_worker_pane(Path::new("/tmp/ws"), "w-1", &env).await.unwrap();

    let fake_pane = pane.pane(&handle).unwrap();
    assert_eq!(fake_pane.sent.len(), 2);
    assert!(fake_pane.sent[0].contains("TASK_ID=t-1"));
}

#[tokio::test]
async fn open_reviewer_pane_splits_off_a_worker_pane_when_one_exists() {
    let (executor, _, pane, _) = setup();

    let worker_handle = executor.open_worker_pane(Path::new("/tmp/ws"), "w-1", &[]).await.unwrap();
    let reviewer_handle = executor.open_reviewer_pane(Path::new("/tmp/ws"), Some(&worker_handle)).await.unwrap();

    assert!(pane.pane(&reviewer_handle).is_some());
    assert_ne!(worker_handle, reviewer_handle);
}

#[tokio::test]
async fn open_reviewer_pane_opens_standalone_with_no_base() {
    let (executor, _, pane, _) = setup();

    let handle = executor.open_reviewer_pane(Path::new("/tmp/ws"), None).await.unwrap();

    assert!(pane.pane(&handle).is_some());
}

#[tokio::test]
async fn close_pane_removes_it() {
    let (executor, _, pane, _) = setup();
    let handle = executor.open_worker_pane(Path::new("/tmp/ws"), "w-1", &[]).await.unwrap();

    executor.close_pane(&handle).await.unwrap();

    assert!(pane.pane(&handle).is_none());
}

#[tokio::test]
async fn pane_is_alive_reflects_external_kill() {
    let (executor, _, pane, _) = setup();
    let handle = executor.open_worker_pane(Path::new("/tmp/ws"), "w-1", &[]).await.unwrap();
    assert!(executor.pane_is_alive(&handle).await);

    pane.kill_externally(&handle);
    assert!(!executor.pane_is_alive(&handle).await);
}

#[tokio::test]
async fn notify_records_the_call() {
    let (executor, _, _, notify) = setup();

    executor.notify("Task completed", "PR ready for review").await.unwrap();

    let calls = notify.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Task completed");
}

#[tokio::test]
async fn remove_workspace_then_open_pr_round_trip() {
    let (executor, workspace, _, _) = setup();
    let path = executor.create_workspace("w-1", "aio/t-1").await.unwrap();

    let url = executor.open_pr(&path, "fix the bug", "body").await.unwrap();
    assert!(url.starts_with("https://"));

    executor.remove_workspace(&path).await.unwrap();
    assert!(!workspace.exists("w-1"));
}
