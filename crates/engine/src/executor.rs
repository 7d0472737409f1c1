// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor: the only thing in the engine that talks to adapters.
//!
//! Unlike a single generic `execute(Effect)` dispatcher, each IO-touching
//! operation here is its own typed async method. Several of them (creating
//! a workspace, opening a pane) need to hand a value back to the caller so
//! it can be persisted into the Store; a uniform `Effect -> Option<Event>`
//! shape doesn't carry that. `aio_core::Effect` remains the vocabulary used
//! for tracing field names, not a dispatch key.

use aio_adapters::notify::NotifyError;
use aio_adapters::pane::{PaneError, SplitSide};
use aio_adapters::workspace::WorkspaceError;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::Clock;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("pane error: {0}")]
    Pane(#[from] PaneError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
}

/// Executes side effects using the configured adapters.
pub struct Executor<W, P, N, C: Clock> {
    workspace: W,
    pane: P,
    notify: N,
    clock: C,
}

impl<W, P, N, C> Executor<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(workspace: W, pane: P, notify: N, clock: C) -> Self {
        Self {
            workspace,
            pane,
            notify,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Fork (or reuse) `branch_name` and materialize a working tree for `worker_id`.
    pub async fn create_workspace(&self, worker_id: &str, branch_name: &str) -> Result<String, ExecuteError> {
        self.traced("create_workspace", async {
            Ok(self.workspace.create_workspace(worker_id, branch_name).await?)
        })
        .await
    }

    pub async fn remove_workspace(&self, path: &str) -> Result<(), ExecuteError> {
        self.traced("remove_workspace", async { Ok(self.workspace.remove_workspace(path).await?) })
            .await
    }

    pub async fn push_branch(&self, path: &str, branch_name: &str) -> Result<(), ExecuteError> {
        self.traced("push_branch", async { Ok(self.workspace.push_branch(path, branch_name).await?) })
            .await
    }

    pub async fn open_pr(&self, path: &str, title: &str, body: &str) -> Result<String, ExecuteError> {
        self.traced("open_pr", async { Ok(self.workspace.open_pr(path, title, body).await?) })
            .await
    }

    /// Open the terminal pane a worker agent runs in, tagged with `env` so
    /// the agent can discover its task/workspace context on startup.
    pub async fn open_worker_pane(&self, cwd: &Path, worker_id: &str, env: &[(String, String)]) -> Result<String, ExecuteError> {
        self.traced("open_worker_pane", async {
            let handle = self.pane.open_pane(cwd, "worker", worker_id).await?;
            for (key, value) in env {
                self.pane.send_text(&handle, &format!("export {key}={value}"), true).await?;
            }
            Ok(handle)
        })
        .await
    }

    /// Open the singleton, on-demand reviewer pane as a split off `base_handle`,
    /// or as a standalone pane in `cwd` if no worker pane exists yet to split from.
    pub async fn open_reviewer_pane(&self, cwd: &Path, base_handle: Option<&str>) -> Result<String, ExecuteError> {
        self.traced("open_reviewer_pane", async {
            let handle = match base_handle {
                Some(base) => self.pane.split_pane(base, SplitSide::Vertical).await?,
                None => self.pane.open_pane(cwd, "reviewer", "reviewer").await?,
            };
            Ok(handle)
        })
        .await
    }

    pub async fn send_to_pane(&self, handle: &str, text: &str) -> Result<(), ExecuteError> {
        self.traced("send_to_pane", async { Ok(self.pane.send_text(handle, text, true).await?) })
            .await
    }

    pub async fn close_pane(&self, handle: &str) -> Result<(), ExecuteError> {
        self.traced("close_pane", async { Ok(self.pane.close_pane(handle).await?) }).await
    }

    pub async fn pane_is_alive(&self, handle: &str) -> bool {
        self.pane.is_alive(handle).await.unwrap_or(false)
    }

    pub async fn notify(&self, title: &str, message: &str) -> Result<(), ExecuteError> {
        self.traced("notify", async { Ok(self.notify.notify(title, message).await?) }).await
    }

    async fn traced<T>(&self, op_name: &'static str, fut: impl std::future::Future<Output = Result<T, ExecuteError>>) -> Result<T, ExecuteError> {
        use tracing::Instrument;
        let span = tracing::info_span!("effect", effect = op_name);
        async {
            let start = std::time::Instant::now();
            let result = fut.await;
            let elapsed = start.elapsed();
            match &result {
                Ok(_) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
                Err(e) => tracing::error!(elapsed_ms = elapsed.as_millis() as u64, error = %e, "failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
