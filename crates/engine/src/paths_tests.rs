// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wal_path_builds_expected_path() {
    assert_eq!(wal_path(Path::new("/state/.aio")), PathBuf::from("/state/.aio/store.wal"));
}

#[test]
fn snapshot_path_builds_expected_path() {
    assert_eq!(snapshot_path(Path::new("/state/.aio")), PathBuf::from("/state/.aio/store.snapshot"));
}

#[test]
fn daemon_socket_and_lock_paths_build_expected_paths() {
    assert_eq!(daemon_socket_path(Path::new("/state/.aio")), PathBuf::from("/state/.aio/daemon.sock"));
    assert_eq!(daemon_lock_path(Path::new("/state/.aio")), PathBuf::from("/state/.aio/daemon.lock"));
}

#[test]
fn generated_tool_config_path_is_scoped_by_role() {
    let planner = generated_tool_config_path(Path::new("/state/.aio"), "planner");
    let worker = generated_tool_config_path(Path::new("/state/.aio"), "worker");
    assert_eq!(planner, PathBuf::from("/state/.aio/.generated/planner.json"));
    assert_ne!(planner, worker);
}

#[test]
fn worktree_dir_builds_expected_path() {
    let result = worktree_dir(Path::new("/repo"), "w-1");
    assert_eq!(result, PathBuf::from("/repo/.worktrees/w-1"));
}

#[test]
fn task_and_worker_log_paths_build_expected_paths() {
    assert_eq!(task_log_path(Path::new("/state/.aio"), "t-1"), PathBuf::from("/state/.aio/logs/t-1.log"));
    assert_eq!(
        worker_log_path(Path::new("/state/.aio"), "w-1"),
        PathBuf::from("/state/.aio/logs/worker-w-1.log")
    );
}
