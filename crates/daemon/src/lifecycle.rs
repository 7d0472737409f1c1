// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: config resolution, exclusive lock acquisition, startup
//! (store replay + socket bind), and graceful shutdown.

use aio_adapters::notify::DesktopNotifyAdapter;
use aio_adapters::pane::TmuxPaneAdapter;
use aio_adapters::workspace::GitWorktreeBackend;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::{Clock, IdGen, SystemClock, UuidIdGen};
use aio_engine::{write_generated_tool_configs, EngineConfig, Executor, HeartbeatReaper, Notifier, OrchestratorLoop, ToolSurface};
use aio_storage::Store;
use fs2::FileExt;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// The adapter stack the daemon runs in production; `DaemonState` itself
/// stays generic so tests can wire in fakes directly.
type DaemonExecutor = Executor<GitWorktreeBackend, TmuxPaneAdapter, DesktopNotifyAdapter, SystemClock>;

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub repo_root: PathBuf,
    pub project_root: PathBuf,
    pub session_id: String,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    /// Resolve configuration from the environment, per the honored variables:
    /// `AIO_STATE_DIR`, `AIO_REPO_ROOT`, `AIO_PROJECT_ROOT`, `AIO_SESSION_ID`,
    /// `AIO_HEARTBEAT_TIMEOUT_SECS`, `AIO_POLL_INTERVAL_MS`. Engine-internal
    /// tunables (`AIO_MAX_COMMAND_OUTPUT_BYTES`, `AIO_MAX_EVENT_RETRIES`) are
    /// layered in underneath from `EngineConfig::from_env`, then the two
    /// externally-documented variables above override timeout/poll if set.
    pub fn load() -> Result<Self, LifecycleError> {
        let repo_root = std::env::var("AIO_REPO_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap_or_default());
        let project_root = std::env::var("AIO_PROJECT_ROOT").map(PathBuf::from).unwrap_or_else(|_| repo_root.clone());
        let state_dir = std::env::var("AIO_STATE_DIR").map(PathBuf::from).unwrap_or_else(|_| repo_root.join(".aio"));
        let session_id = std::env::var("AIO_SESSION_ID").unwrap_or_else(|_| UuidIdGen.next_id("session"));

        let mut engine = EngineConfig::from_env();
        if let Ok(secs) = std::env::var("AIO_HEARTBEAT_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<i64>() {
                engine.heartbeat_timeout_ms = secs * 1000;
            }
        }
        if let Ok(ms) = std::env::var("AIO_POLL_INTERVAL_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                engine.poll_interval_ms = ms;
            }
        }

        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.lock"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
            repo_root,
            project_root,
            session_id,
            engine,
        })
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to acquire lock: daemon already running against this store?")]
    LockFailed(#[source] std::io::Error),
    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] aio_storage::StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the exclusive lock file, the listener socket, and every cooperating
/// component (OrchestratorLoop, Notifier, HeartbeatReaper, ToolSurface).
/// Generic over the adapter stack so tests can wire in fakes directly;
/// `startup` always produces the production instantiation below.
pub struct DaemonState<W, P, N, C: Clock> {
    pub config: Config,
    #[allow(dead_code)]
    lock_file: File,
    pub store: Arc<Store>,
    pub orchestrator: Arc<OrchestratorLoop<W, P, N, C>>,
    pub notifier: Arc<Notifier<W, P, N, C>>,
    pub reaper: Arc<HeartbeatReaper<W, P, N, C>>,
    pub tool_surface: Arc<ToolSurface<W, P, N, C>>,
    pub start_time: Instant,
    /// Orphaned workers reconciled since startup. Runs in the background so
    /// reconciliation never delays the socket accepting connections; `usize::MAX`
    /// means reconciliation is still in flight.
    pub orphans_reconciled: Arc<AtomicUsize>,
}

/// The concrete, production-adapter instantiation the daemon binary runs.
pub type ProdDaemonState = DaemonState<GitWorktreeBackend, TmuxPaneAdapter, DesktopNotifyAdapter, SystemClock>;

pub struct StartupResult {
    pub daemon: ProdDaemonState,
    pub listener: UnixListener,
}

/// Sentinel stored in `orphans_reconciled` while the background reconciliation
/// task is still running.
pub const RECONCILING: usize = usize::MAX;

pub async fn startup(config: Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let lock_file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;
    {
        use std::io::Write;
        let mut lock_file = &lock_file;
        lock_file.set_len(0)?;
        writeln!(lock_file, "{}", std::process::id())?;
    }

    let store = Arc::new(Store::open(&config.state_dir)?);
    info!(tasks = store.list_tasks().len(), workers = store.list_active_workers().len(), "store opened");

    write_generated_tool_configs(&config.state_dir, &config.socket_path)?;

    let workspace = GitWorktreeBackend::new(config.repo_root.clone());
    let pane = TmuxPaneAdapter;
    let notify = DesktopNotifyAdapter;
    let clock = SystemClock;

    let orchestrator_executor: DaemonExecutor = Executor::new(workspace.clone(), pane.clone(), notify.clone(), clock.clone());
    let notifier_executor: DaemonExecutor = Executor::new(workspace.clone(), pane.clone(), notify.clone(), clock.clone());
    let reaper_executor: DaemonExecutor = Executor::new(workspace.clone(), pane.clone(), notify.clone(), clock.clone());
    let tool_surface_executor: DaemonExecutor = Executor::new(workspace, pane, notify, clock);

    let id_gen = Arc::new(UuidIdGen);

    let orchestrator = Arc::new(OrchestratorLoop::new(
        Arc::clone(&store),
        orchestrator_executor,
        Arc::clone(&id_gen) as Arc<dyn aio_core::IdGen>,
        config.engine,
        config.repo_root.clone(),
        config.state_dir.clone(),
    ));
    let notifier = Arc::new(Notifier::new(Arc::clone(&store), notifier_executor));
    let reaper = Arc::new(HeartbeatReaper::new(Arc::clone(&store), reaper_executor, config.engine));
    let tool_surface = Arc::new(ToolSurface::new(
        Arc::clone(&store),
        tool_surface_executor,
        id_gen as Arc<dyn aio_core::IdGen>,
        config.engine,
        config.state_dir.clone(),
    ));

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path).map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    // Orphans left running by a previous crash are reconciled in the background
    // so a slow pane check never delays the socket from accepting connections;
    // `status` can be served while this is still in flight.
    let orphans_reconciled = Arc::new(AtomicUsize::new(RECONCILING));
    {
        let reaper = Arc::clone(&reaper);
        let orphans_reconciled = Arc::clone(&orphans_reconciled);
        tokio::spawn(async move {
            let count = reaper.reconcile_orphans().await;
            if count > 0 {
                warn!(count, "reconciled orphaned workers left by a previous crash");
            }
            orphans_reconciled.store(count, Ordering::SeqCst);
        });
    }

    Ok(StartupResult {
        daemon: DaemonState {
            config,
            lock_file,
            store,
            orchestrator,
            notifier,
            reaper,
            tool_surface,
            start_time: Instant::now(),
            orphans_reconciled,
        },
        listener,
    })
}

impl<W, P, N, C> DaemonState<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn shutdown(&self) {
        info!("shutting down daemon");
        if let Err(e) = self.store.checkpoint() {
            warn!(error = %e, "failed to checkpoint store on shutdown");
        }
        if self.config.socket_path.exists() {
            let _ = std::fs::remove_file(&self.config.socket_path);
        }
        if self.config.lock_path.exists() {
            let _ = std::fs::remove_file(&self.config.lock_path);
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
