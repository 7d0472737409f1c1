// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Accept loop: one task per connection, each request dispatched to the
//! matching `ToolSurface`/engine method and answered with a `Response`.

use crate::lifecycle::DaemonState;
use crate::protocol::{wire, Request, Response};
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::{Clock, ToolError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Drives the Notifier on its own poll loop; it has no `run` of its own
/// since `Notifier::tick` is also called directly in tests.
pub async fn run_notifier_loop<W, P, N, C>(daemon: Arc<DaemonState<W, P, N, C>>, mut shutdown: watch::Receiver<bool>)
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    loop {
        if *shutdown.borrow() {
            return;
        }
        daemon.notifier.tick().await;
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(daemon.config.engine.poll_interval_ms)) => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return;
                }
            }
        }
    }
}

/// Accept connections until `shutdown` fires. Each connection is handled on
/// its own spawned task so a slow or stuck client never blocks the rest.
pub async fn accept_loop<W, P, N, C>(listener: UnixListener, daemon: Arc<DaemonState<W, P, N, C>>, shutdown_tx: watch::Sender<bool>, mut shutdown: watch::Receiver<bool>)
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let daemon = Arc::clone(&daemon);
                        let shutdown_tx = shutdown_tx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, daemon, shutdown_tx).await {
                                debug!(error = %e, "connection ended with an error");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return;
                }
            }
        }
    }
}

async fn handle_connection<W, P, N, C>(mut stream: UnixStream, daemon: Arc<DaemonState<W, P, N, C>>, shutdown_tx: watch::Sender<bool>) -> Result<(), wire::ProtocolError>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let request = wire::read_request(&mut stream, wire::DEFAULT_TIMEOUT).await?;
    let response = dispatch(&daemon, &shutdown_tx, request).await;
    wire::write_response(&mut stream, &response, wire::DEFAULT_TIMEOUT).await
}

async fn dispatch<W, P, N, C>(daemon: &Arc<DaemonState<W, P, N, C>>, shutdown_tx: &watch::Sender<bool>, request: Request) -> Response
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    let tool_surface = &daemon.tool_surface;
    match request {
        Request::Ping => Response::Pong,
        Request::SubmitTask { description, context, branch_name } => {
            match tool_surface.submit_task(description, context, branch_name) {
                Ok(task_id) => Response::TaskId { task_id: task_id.to_string() },
                Err(e) => e.into(),
            }
        }
        Request::ListTasks => Response::Tasks { tasks: tool_surface.list_tasks() },
        Request::ListWorkers => Response::Workers { workers: tool_surface.list_workers() },
        Request::Heartbeat { worker_id } => ok_or_error(tool_surface.heartbeat(&worker_id)),
        Request::Progress { worker_id, status, message } => ok_or_error(tool_surface.progress(&worker_id, &status, &message)),
        Request::CreatePr { worker_id, title, body, summary } => match tool_surface.create_pr(&worker_id, &title, &body, &summary).await {
            Ok(pr_url) => Response::PrUrl { pr_url },
            Err(e) => e.into(),
        },
        Request::CheckEvents { worker_id } => match tool_surface.check_events(&worker_id) {
            Ok(result) => Response::Events {
                events: result.events,
                should_terminate: result.should_terminate,
            },
            Err(e) => e.into(),
        },
        Request::ExecuteCommand { worker_id: _, cmd, cwd, timeout_ms, background } => {
            match tool_surface.execute_command(&cmd, &cwd, timeout_ms, background).await {
                Ok(output) => Response::CommandResult(output),
                Err(e) => e.into(),
            }
        }
        Request::ClaimNextReview => Response::Task { task: tool_surface.claim_next_review() },
        Request::SubmitReview { task_id, approved, feedback } => ok_or_error(tool_surface.submit_review(&task_id, approved, feedback)),
        Request::EmergencyStop { worker_id, reason } => match tool_surface.emergency_stop(&worker_id, &reason).await {
            Ok(()) => Response::Ok,
            Err(e) => e.into(),
        },
        Request::Status => {
            let store = &daemon.store;
            Response::Status {
                uptime_secs: daemon.start_time.elapsed().as_secs(),
                tasks_active: store.list_tasks().into_iter().filter(|t| t.is_live()).count(),
                workers_active: store.list_active_workers().len(),
                orphans_reconciled: match daemon.orphans_reconciled.load(Ordering::SeqCst) {
                    crate::lifecycle::RECONCILING => 0,
                    count => count,
                },
            }
        }
        Request::Shutdown => {
            let _ = shutdown_tx.send(true);
            Response::ShuttingDown
        }
    }
}

fn ok_or_error(result: Result<(), ToolError>) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(e) => e.into(),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
