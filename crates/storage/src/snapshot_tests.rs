// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aio_core::{Task, TaskId, Worker, WorkerId, WorkerStatus};
use tempfile::tempdir;

fn state_with_one_task() -> MaterializedState {
    let mut state = MaterializedState::default();
    let task = Task::new(
        TaskId::new("t-1"),
        "fix the bug".into(),
        None,
        "aio/t-1".into(),
        1_000,
    );
    state.upsert_task(task);
    state.processed_seq = 7;
    state
}

#[test]
fn round_trips_through_write_and_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.snapshot");

    let state = state_with_one_task();
    Snapshot::write(&path, &state).unwrap();
    assert!(path.exists());

    let loaded = Snapshot::read(&path).unwrap().unwrap();
    assert_eq!(loaded.processed_seq, 7);
    assert!(loaded.get_task("t-1").is_some());
}

#[test]
fn read_of_missing_path_is_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.snapshot");

    assert!(Snapshot::read(&path).unwrap().is_none());
}

#[test]
fn write_leaves_no_tmp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.snapshot");
    let tmp = path.with_extension("snapshot.tmp");

    Snapshot::write(&path, &state_with_one_task()).unwrap();

    assert!(!tmp.exists());
    assert!(path.exists());
}

#[test]
fn preserves_worker_and_cursor_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.snapshot");

    let mut state = state_with_one_task();
    state.register_worker(Worker {
        id: WorkerId::new("w-1"),
        status: WorkerStatus::Running,
        task_id: Some(TaskId::new("t-1")),
        pane_handle: Some("pane-0".into()),
        last_heartbeat_ms: 2_000,
    });
    state.cursor_put("planner", 5);

    Snapshot::write(&path, &state).unwrap();
    let loaded = Snapshot::read(&path).unwrap().unwrap();

    assert_eq!(loaded.get_worker("w-1").unwrap().last_heartbeat_ms, 2_000);
    assert_eq!(loaded.cursor_get("planner"), 5);
}

#[test]
fn write_overwrites_an_existing_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.snapshot");

    Snapshot::write(&path, &state_with_one_task()).unwrap();

    let mut second = MaterializedState::default();
    second.processed_seq = 99;
    Snapshot::write(&path, &second).unwrap();

    let loaded = Snapshot::read(&path).unwrap().unwrap();
    assert_eq!(loaded.processed_seq, 99);
    assert!(loaded.get_task("t-1").is_none());
}
