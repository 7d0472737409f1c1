// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lifecycle::{Config, RECONCILING};
use crate::protocol::wire;
use aio_adapters::{FakeNotifyAdapter, FakePaneAdapter, FakeWorkspaceBackend};
use aio_core::{FakeClock, SequentialIdGen};
use aio_engine::{EngineConfig, Executor};
use aio_storage::Store;
use std::fs::File;
use std::time::Instant;
use tokio::net::{UnixListener, UnixStream};

type TestState = DaemonState<FakeWorkspaceBackend, FakePaneAdapter, FakeNotifyAdapter, FakeClock>;

fn setup(dir: &std::path::Path) -> (Arc<TestState>, watch::Sender<bool>, watch::Receiver<bool>) {
    let store = Arc::new(Store::open(dir).unwrap());
    let id_gen: Arc<dyn aio_core::IdGen> = Arc::new(SequentialIdGen::new());
    let engine_config = EngineConfig::default();

    let executor = || Executor::new(FakeWorkspaceBackend::new(), FakePaneAdapter::new(), FakeNotifyAdapter::new(), FakeClock::new());

    let orchestrator = Arc::new(aio_engine::OrchestratorLoop::new(
        Arc::clone(&store),
        executor(),
        Arc::clone(&id_gen),
        engine_config,
        dir.to_path_buf(),
        dir.to_path_buf(),
    ));
    let notifier = Arc::new(aio_engine::Notifier::new(Arc::clone(&store), executor()));
    let reaper = Arc::new(aio_engine::HeartbeatReaper::new(Arc::clone(&store), executor(), engine_config));
    let tool_surface = Arc::new(aio_engine::ToolSurface::new(Arc::clone(&store), executor(), id_gen, engine_config, dir.to_path_buf()));

    let config = Config {
        state_dir: dir.to_path_buf(),
        repo_root: dir.to_path_buf(),
        project_root: dir.to_path_buf(),
        session_id: "test".into(),
        socket_path: dir.join("daemon.sock"),
        lock_path: dir.join("daemon.lock"),
        log_path: dir.join("daemon.log"),
        engine: engine_config,
    };
    let lock_file = File::create(&config.lock_path).unwrap();

    let daemon = Arc::new(DaemonState {
        config,
        lock_file,
        store,
        orchestrator,
        notifier,
        reaper,
        tool_surface,
        start_time: Instant::now(),
        orphans_reconciled: Arc::new(std::sync::atomic::AtomicUsize::new(RECONCILING)),
    });
    let (tx, rx) = watch::channel(false);
    (daemon, tx, rx)
}

async fn roundtrip(socket_path: &std::path::Path, request: Request) -> Response {
    let mut stream = UnixStream::connect(socket_path).await.unwrap();
    wire::write_request(&mut stream, &request, wire::DEFAULT_TIMEOUT).await.unwrap();
    wire::read_response(&mut stream, wire::DEFAULT_TIMEOUT).await.unwrap()
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let dir = tempfile::tempdir().unwrap();
    let (daemon, shutdown_tx, shutdown_rx) = setup(dir.path());
    let listener = UnixListener::bind(&daemon.config.socket_path).unwrap();
    let socket_path = daemon.config.socket_path.clone();
    tokio::spawn(accept_loop(listener, daemon, shutdown_tx, shutdown_rx));

    let response = roundtrip(&socket_path, Request::Ping).await;
    assert_eq!(response, Response::Pong);
}

#[tokio::test]
async fn submitting_a_task_then_listing_it_round_trips_through_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let (daemon, shutdown_tx, shutdown_rx) = setup(dir.path());
    let listener = UnixListener::bind(&daemon.config.socket_path).unwrap();
    let socket_path = daemon.config.socket_path.clone();
    tokio::spawn(accept_loop(listener, daemon, shutdown_tx, shutdown_rx));

    let submit = roundtrip(
        &socket_path,
        Request::SubmitTask {
            description: "add a feature".into(),
            context: None,
            branch_name: None,
        },
    )
    .await;
    let task_id = match submit {
        Response::TaskId { task_id } => task_id,
        other => panic!("expected TaskId, got {other:?}"),
    };

    let list = roundtrip(&socket_path, Request::ListTasks).await;
    match list {
        Response::Tasks { tasks } => assert!(tasks.iter().any(|t| t.id.as_str() == task_id)),
        other => panic!("expected Tasks, got {other:?}"),
    }
}

#[tokio::test]
async fn heartbeat_for_an_unknown_worker_returns_a_not_found_error() {
    let dir = tempfile::tempdir().unwrap();
    let (daemon, shutdown_tx, shutdown_rx) = setup(dir.path());
    let listener = UnixListener::bind(&daemon.config.socket_path).unwrap();
    let socket_path = daemon.config.socket_path.clone();
    tokio::spawn(accept_loop(listener, daemon, shutdown_tx, shutdown_rx));

    let response = roundtrip(&socket_path, Request::Heartbeat { worker_id: "ghost".into() }).await;
    match response {
        Response::Error { error } => assert_eq!(error.code, aio_core::ToolErrorCode::NotFound),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn status_reports_zero_orphans_while_reconciliation_is_still_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let (daemon, shutdown_tx, shutdown_rx) = setup(dir.path());
    let listener = UnixListener::bind(&daemon.config.socket_path).unwrap();
    let socket_path = daemon.config.socket_path.clone();
    tokio::spawn(accept_loop(listener, daemon, shutdown_tx, shutdown_rx));

    let response = roundtrip(&socket_path, Request::Status).await;
    match response {
        Response::Status { orphans_reconciled, .. } => assert_eq!(orphans_reconciled, 0),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn shutdown_request_flips_the_watch_channel() {
    let dir = tempfile::tempdir().unwrap();
    let (daemon, shutdown_tx, shutdown_rx) = setup(dir.path());
    let listener = UnixListener::bind(&daemon.config.socket_path).unwrap();
    let socket_path = daemon.config.socket_path.clone();
    let mut watcher = shutdown_tx.subscribe();
    tokio::spawn(accept_loop(listener, daemon, shutdown_tx, shutdown_rx));

    let response = roundtrip(&socket_path, Request::Shutdown).await;
    assert_eq!(response, Response::ShuttingDown);
    watcher.changed().await.unwrap();
    assert!(*watcher.borrow());
}
