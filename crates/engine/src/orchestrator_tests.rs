// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aio_adapters::{FakeNotifyAdapter, FakePaneAdapter, FakeWorkspaceBackend};
use aio_core::{FakeClock, SequentialIdGen, Task, TaskId};
use tempfile::tempdir;

type TestLoop = OrchestratorLoop<FakeWorkspaceBackend, FakePaneAdapter, FakeNotifyAdapter, FakeClock>;

struct Harness {
    orchestrator: TestLoop,
    store: Arc<Store>,
    workspace: FakeWorkspaceBackend,
    pane: FakePaneAdapter,
    notify: FakeNotifyAdapter,
    _dir: tempfile::TempDir,
}

fn setup() -> Harness {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let workspace = FakeWorkspaceBackend::new();
    let pane = FakePaneAdapter::new();
    let notify = FakeNotifyAdapter::new();
    let executor = Executor::new(workspace.clone(), pane.clone(), notify.clone(), FakeClock::new());
    let orchestrator = OrchestratorLoop::new(
        Arc::clone(&store),
        executor,
        Arc::new(SequentialIdGen::new()),
        EngineConfig::default(),
        dir.path().to_path_buf(),
        dir.path().to_path_buf(),
    );
    Harness {
        orchestrator,
        store,
        workspace,
        pane,
        notify,
        _dir: dir,
    }
}

fn submit_task(store: &Store, task_id: &str, branch: &str) -> aio_core::Event {
    store.upsert_task(Task::new(TaskId::new(task_id), "fix the bug".into(), None, branch.into(), 100));
    store
        .append_event(
            TaskId::new(task_id),
            EventPayload::TaskCreate {
                task_id: TaskId::new(task_id),
                description: "fix the bug".into(),
                context: None,
                branch_name: branch.into(),
            },
            100,
        )
        .unwrap()
}

#[tokio::test]
async fn task_create_spawns_a_workspace_and_worker_pane() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");

    let processed = h.orchestrator.tick().await;

    assert_eq!(processed, 1);
    assert!(h.store.unprocessed_events(10).is_empty());
    let task = h.store.get_task("t-1").unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.worker_id.is_some());
    assert!(h.workspace.exists(task.worker_id.as_ref().unwrap().as_str()));
    let worker = h.store.get_worker(task.worker_id.as_ref().unwrap().as_str()).unwrap();
    assert!(h.pane.pane(worker.pane_handle.as_ref().unwrap()).is_some());
}

#[tokio::test]
async fn task_create_mirrors_the_transition_to_the_task_log_file() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");

    h.orchestrator.tick().await;

    let contents = std::fs::read_to_string(paths::task_log_path(h._dir.path(), "t-1")).unwrap();
    assert!(contents.contains("in_progress"));
}

#[tokio::test]
async fn task_create_is_idempotent_on_redispatch() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");
    h.orchestrator.tick().await;
    let first_worker = h.store.get_task("t-1").unwrap().worker_id.unwrap();

    // Re-append the same logical event and dispatch again, simulating a replay.
    h.store
        .append_event(
            TaskId::new("t-1"),
            EventPayload::TaskCreate {
                task_id: TaskId::new("t-1"),
                description: "fix the bug".into(),
                context: None,
                branch_name: "aio/t-1".into(),
            },
            200,
        )
        .unwrap();
    h.orchestrator.tick().await;

    // Status already in_progress, so the idempotency guard no-ops; worker is unchanged.
    assert_eq!(h.store.get_task("t-1").unwrap().worker_id.unwrap(), first_worker);
}

#[tokio::test]
async fn review_requested_transitions_to_review_and_opens_a_reviewer_pane_once() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");
    h.orchestrator.tick().await;

    h.store
        .append_event(
            TaskId::new("t-1"),
            EventPayload::ReviewRequested {
                task_id: TaskId::new("t-1"),
                pr_url: "https://example.invalid/pr/1".into(),
                summary: "done".into(),
            },
            300,
        )
        .unwrap();
    h.orchestrator.tick().await;

    let task = h.store.get_task("t-1").unwrap();
    assert_eq!(task.status, TaskStatus::Review);
    assert_eq!(task.pr_url.as_deref(), Some("https://example.invalid/pr/1"));
    let reviewer_pane = h.store.reviewer_pane();
    assert!(reviewer_pane.is_some());

    // A second review-requested event (e.g. for a different task) must not open a second pane.
    submit_task(&h.store, "t-2", "aio/t-2");
    h.orchestrator.tick().await;
    h.store
        .append_event(
            TaskId::new("t-2"),
            EventPayload::ReviewRequested {
                task_id: TaskId::new("t-2"),
                pr_url: "https://example.invalid/pr/2".into(),
                summary: "done".into(),
            },
            400,
        )
        .unwrap();
    h.orchestrator.tick().await;
    assert_eq!(h.store.reviewer_pane(), reviewer_pane);
}

#[tokio::test]
async fn review_approved_completes_the_task_and_tears_down_the_worker() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");
    h.orchestrator.tick().await;
    let worker_id = h.store.get_task("t-1").unwrap().worker_id.unwrap();
    let pane_handle = h.store.get_worker(worker_id.as_str()).unwrap().pane_handle.unwrap();

    h.store
        .append_event(TaskId::new("t-1"), EventPayload::ReviewApproved { task_id: TaskId::new("t-1") }, 300)
        .unwrap();
    h.orchestrator.tick().await;

    assert_eq!(h.store.get_task("t-1").unwrap().status, TaskStatus::Completed);
    assert!(h.store.get_worker(worker_id.as_str()).is_none());
    assert!(h.pane.pane(&pane_handle).is_none());
    assert!(!h.workspace.exists(worker_id.as_str()));
    assert_eq!(h.notify.calls().len(), 1);
}

#[tokio::test]
async fn review_denied_sends_feedback_and_reopens_the_task() {
    let h = setup();
    submit_task(&h.store, "t-1", "aio/t-1");
    h.orchestrator.tick().await;
    let worker_id = h.store.get_task("t-1").unwrap().worker_id.unwrap();
    let pane_handle = h.store.get_worker(worker_id.as_str()).unwrap().pane_handle.unwrap();

    h.store
        .append_event(
            TaskId::new("t-1"),
            EventPayload::ReviewDenied {
                task_id: TaskId::new("t-1"),
                feedback: "add a test".into(),
            },
            300,
        )
        .unwrap();
    h.orchestrator.tick().await;

    assert_eq!(h.store.get_task("t-1").unwrap().status, TaskStatus::InProgress);
    let sent = h.pane.pane(&pane_handle).unwrap().sent;
    assert!(sent.iter().any(|s| s.contains("add a test")));
}

#[tokio::test]
async fn dispatch_failure_is_retried_up_to_the_ceiling_then_fails_the_task() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let workspace = FakeWorkspaceBackend::new();
    let pane = FakePaneAdapter::new();
    let notify = FakeNotifyAdapter::new();
    let executor = Executor::new(workspace, pane, notify, FakeClock::new());
    let orchestrator = OrchestratorLoop::new(
        Arc::clone(&store),
        executor,
        Arc::new(SequentialIdGen::new()),
        EngineConfig {
            max_event_retries: 2,
            ..EngineConfig::default()
        },
        dir.path().to_path_buf(),
        dir.path().to_path_buf(),
    );

    // A review-approved event for a task that was never created: get_task fails
    // every attempt, exhausting the retry ceiling.
    store
        .append_event(TaskId::new("ghost"), EventPayload::ReviewApproved { task_id: TaskId::new("ghost") }, 100)
        .unwrap();

    assert_eq!(orchestrator.tick().await, 0);
    assert_eq!(orchestrator.tick().await, 1);
    assert!(store.unprocessed_events(10).is_empty());
}
