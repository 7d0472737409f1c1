// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat reaper: periodically scans for Workers that have stopped
//! heartbeating and for orphans left `running` by a crashed previous daemon,
//! and cleans them up. Mutates Worker/Task rows directly; never appends an
//! event, since this is cleanup rather than business logic the OrchestratorLoop
//! needs to see.

use crate::config::EngineConfig;
use crate::executor::Executor;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::{Clock, Worker};
use aio_storage::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct HeartbeatReaper<W, P, N, C: Clock> {
    store: Arc<Store>,
    executor: Executor<W, P, N, C>,
    config: EngineConfig,
}

impl<W, P, N, C> HeartbeatReaper<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(store: Arc<Store>, executor: Executor<W, P, N, C>, config: EngineConfig) -> Self {
        Self { store, executor, config }
    }

    /// Run until `shutdown` is set, ticking every `poll_interval_ms`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            self.tick().await;
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
            }
        }
    }

    /// Reap every worker whose heartbeat has gone stale. Returns the count reaped.
    pub async fn tick(&self) -> usize {
        let now = self.executor.clock().now_ms();
        let mut reaped = 0;
        for worker in self.store.list_active_workers() {
            if worker.is_stale(now, self.config.heartbeat_timeout_ms) {
                self.reap(&worker, "heartbeat timeout").await;
                reaped += 1;
            }
        }
        reaped
    }

    /// Run once at daemon startup: confirm every worker left behind by a
    /// prior crash is still backed by a live pane, reaping it immediately if
    /// not rather than waiting out a full heartbeat timeout.
    pub async fn reconcile_orphans(&self) -> usize {
        let mut reaped = 0;
        for worker in self.store.list_active_workers() {
            let alive = match &worker.pane_handle {
                Some(pane) => self.executor.pane_is_alive(pane).await,
                None => false,
            };
            if !alive {
                self.reap(&worker, "orphaned after restart, pane is gone").await;
                reaped += 1;
            }
        }
        reaped
    }

    async fn reap(&self, worker: &Worker, reason: &str) {
        let now = self.executor.clock().now_ms();

        if let Some(task_id) = &worker.task_id {
            let _ = self.store.fail_task(task_id.as_str(), reason.to_string(), now);
            if let Some(task) = self.store.get_task(task_id.as_str()) {
                if let Some(path) = &task.worktree_path {
                    if let Err(e) = self.executor.remove_workspace(path).await {
                        tracing::warn!(worker = worker.id.as_str(), error = %e, "failed to remove workspace while reaping");
                    }
                }
            }
        }

        if let Some(pane) = &worker.pane_handle {
            if let Err(e) = self.executor.close_pane(pane).await {
                tracing::warn!(worker = worker.id.as_str(), error = %e, "failed to close pane while reaping");
            }
        }

        self.store.remove_worker(worker.id.as_str());
        tracing::info!(worker = worker.id.as_str(), reason, "reaped worker");
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
