// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Orchestrator Daemon (aiod)
//!
//! Background process that owns the durable event log and dispatches work
//! to the OrchestratorLoop, Notifier, and HeartbeatReaper. Started by the
//! `aio` CLI and should not be invoked directly; it listens on a Unix
//! socket for commands.

use aio_daemon::lifecycle::{self, Config, LifecycleError, StartupResult};
use aio_daemon::listener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("aiod {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("aiod {}", env!("CARGO_PKG_VERSION"));
                println!("Agent Orchestrator Daemon - owns the event log and dispatches work");
                println!();
                println!("The daemon is typically started by the `aio` CLI and should not be");
                println!("invoked directly. It listens on a Unix socket for commands from `aio`.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    let _log_guard = setup_logging(&config)?;

    info!(session_id = %config.session_id, "starting daemon");

    let StartupResult { daemon, listener: unix_listener } = match lifecycle::startup(config).await {
        Ok(r) => r,
        Err(LifecycleError::LockFailed(_)) => {
            eprintln!("aiod is already running against this state directory");
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            return Err(e.into());
        }
    };
    let daemon = std::sync::Arc::new(daemon);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let daemon = std::sync::Arc::clone(&daemon);
        let shutdown_rx = shutdown_rx.clone();
        async move { daemon.orchestrator.run(shutdown_rx).await }
    });
    tokio::spawn({
        let daemon = std::sync::Arc::clone(&daemon);
        let shutdown_rx = shutdown_rx.clone();
        async move { daemon.reaper.run(shutdown_rx).await }
    });
    tokio::spawn({
        let daemon = std::sync::Arc::clone(&daemon);
        listener::run_notifier_loop(daemon, shutdown_rx.clone())
    });
    tokio::spawn(listener::accept_loop(unix_listener, std::sync::Arc::clone(&daemon), shutdown_tx.clone(), shutdown_rx.clone()));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut shutdown_watch = shutdown_rx;

    info!(socket = %daemon.config.socket_path.display(), "daemon ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
        _ = shutdown_watch.changed() => info!("shutdown requested over the socket"),
    }
    let _ = shutdown_tx.send(true);

    daemon.shutdown();
    info!("daemon stopped");
    Ok(())
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        config.log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
