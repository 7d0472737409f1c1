// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The core state machine: a single-threaded loop that fetches unprocessed
//! events in `seq` order, dispatches each to its handler, and marks it
//! processed. Runs alongside the Notifier and Heartbeat Reaper as
//! cooperating tasks inside the daemon process.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::executor::Executor;
use crate::paths;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::{Clock, Event, EventPayload, IdGen, TaskId, TaskStatus, Worker, WorkerId};
use aio_storage::{Store, StoreError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Events fetched from the pending queue and dispatched per tick.
const BATCH_LIMIT: usize = 64;

pub struct OrchestratorLoop<W, P, N, C: Clock> {
    store: Arc<Store>,
    executor: Executor<W, P, N, C>,
    id_gen: Arc<dyn IdGen>,
    config: EngineConfig,
    /// Root of the target repository; the reviewer pane opens here when no
    /// worker pane exists yet to split off of.
    repo_root: PathBuf,
    /// Where `.aio/logs/<task_id>.log` lives; mirrors lifecycle transitions
    /// for after-the-fact inspection, separate from the event log itself.
    state_dir: PathBuf,
    retry_counts: Mutex<HashMap<u64, u32>>,
}

impl<W, P, N, C> OrchestratorLoop<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(
        store: Arc<Store>,
        executor: Executor<W, P, N, C>,
        id_gen: Arc<dyn IdGen>,
        config: EngineConfig,
        repo_root: PathBuf,
        state_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            executor,
            id_gen,
            config,
            repo_root,
            state_dir,
            retry_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Append one line to the task's activity log. Best-effort: a logging
    /// failure never blocks a state transition.
    fn log_task_event(&self, task_id: &TaskId, now: i64, line: &str) {
        let path = paths::task_log_path(&self.state_dir, task_id.as_str());
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(task_id = %task_id, error = %e, "failed to create task log directory");
                return;
            }
        }
        use std::io::Write;
        match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "[{now}] {line}") {
                    tracing::warn!(task_id = %task_id, error = %e, "failed to write task log");
                }
            }
            Err(e) => tracing::warn!(task_id = %task_id, error = %e, "failed to open task log"),
        }
    }

    /// Run until `shutdown` is set to `true`, sleeping for the configured
    /// poll interval whenever a tick processes nothing.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            let processed = self.tick().await;
            if processed > 0 {
                continue;
            }
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

    /// Dispatch every currently-unprocessed event once. Returns the number
    /// that advanced (succeeded, or hit the retry ceiling and were failed).
    pub async fn tick(&self) -> usize {
        let events = self.store.unprocessed_events(BATCH_LIMIT);
        let mut advanced = 0;
        for event in &events {
            match self.dispatch(event).await {
                Ok(()) => {
                    if let Err(e) = self.store.mark_processed(event.seq) {
                        tracing::error!(seq = event.seq, error = %e, "failed to mark event processed");
                        continue;
                    }
                    self.retry_counts.lock().remove(&event.seq);
                    advanced += 1;
                }
                Err(e) => {
                    let attempt = {
                        let mut counts = self.retry_counts.lock();
                        let count = counts.entry(event.seq).or_insert(0);
                        *count += 1;
                        *count
                    };
                    if attempt >= self.config.max_event_retries {
                        tracing::error!(seq = event.seq, event = event.name(), error = %e, attempt, "retry ceiling exceeded, failing task");
                        self.fail_event_task(event, &e.to_string()).await;
                        let _ = self.store.mark_processed(event.seq);
                        self.retry_counts.lock().remove(&event.seq);
                        advanced += 1;
                    } else {
                        tracing::warn!(seq = event.seq, event = event.name(), error = %e, attempt, "dispatch failed, will retry");
                    }
                }
            }
        }
        advanced
    }

    async fn dispatch(&self, event: &Event) -> Result<(), EngineError> {
        match &event.payload {
            EventPayload::TaskCreate {
                task_id, branch_name, ..
            } => self.handle_task_create(task_id, branch_name).await,
            EventPayload::ReviewRequested { task_id, pr_url, .. } => self.handle_review_requested(task_id, pr_url).await,
            EventPayload::ReviewApproved { task_id } => self.handle_review_approved(task_id).await,
            EventPayload::ReviewDenied { task_id, feedback } => self.handle_review_denied(task_id, feedback).await,
        }
    }

    async fn handle_task_create(&self, task_id: &TaskId, branch_name: &str) -> Result<(), EngineError> {
        let task = self.store.get_task(task_id.as_str()).ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;
        if task.status != TaskStatus::Pending {
            return Ok(());
        }
        let now = self.executor.clock().now_ms();

        let worker_id = match task.worker_id.clone() {
            Some(id) => id,
            None => {
                let id = WorkerId::new(self.id_gen.next_id("w"));
                self.store.set_task_worker(task_id.as_str(), Some(id.clone()), now)?;
                id
            }
        };

        let path = self.executor.create_workspace(worker_id.as_str(), branch_name).await?;
        self.store.set_task_workspace(task_id.as_str(), Some(path.clone()), now)?;

        if self.store.get_worker(worker_id.as_str()).is_none() {
            let env = vec![
                ("AIO_TASK_ID".to_string(), task_id.to_string()),
                ("AIO_WORKER_ID".to_string(), worker_id.to_string()),
                ("AIO_WORKSPACE_PATH".to_string(), path.clone()),
                ("AIO_BRANCH_NAME".to_string(), branch_name.to_string()),
            ];
            let pane_handle = self.executor.open_worker_pane(Path::new(&path), worker_id.as_str(), &env).await?;
            self.store.register_worker(Worker::new(worker_id.clone(), task_id.clone(), pane_handle, now));
        }

        self.store.update_task_status(task_id.as_str(), TaskStatus::InProgress, now)?;
        self.log_task_event(task_id, now, &format!("in_progress: worker {worker_id} spawned in {path}"));
        Ok(())
    }

    async fn handle_review_requested(&self, task_id: &TaskId, pr_url: &str) -> Result<(), EngineError> {
        let now = self.executor.clock().now_ms();
        self.store.update_task_status(task_id.as_str(), TaskStatus::Review, now)?;
        self.store.set_pr_url(task_id.as_str(), pr_url.to_string(), now)?;

        if self.store.reviewer_pane().is_none() {
            let handle = self.executor.open_reviewer_pane(&self.repo_root, None).await?;
            self.store.set_reviewer_pane(Some(handle));
        }
        self.log_task_event(task_id, now, &format!("review: pr opened at {pr_url}"));
        Ok(())
    }

    async fn handle_review_approved(&self, task_id: &TaskId) -> Result<(), EngineError> {
        let task = self.store.get_task(task_id.as_str()).ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;
        if task.status == TaskStatus::Completed {
            return Ok(());
        }
        let now = self.executor.clock().now_ms();

        if let Some(worker_id) = task.worker_id.clone() {
            if let Some(worker) = self.store.get_worker(worker_id.as_str()) {
                if let Some(pane) = &worker.pane_handle {
                    self.executor.close_pane(pane).await?;
                }
            }
            if let Some(path) = &task.worktree_path {
                self.executor.remove_workspace(path).await?;
            }
            self.store.remove_worker(worker_id.as_str());
        }

        self.store.update_task_status(task_id.as_str(), TaskStatus::Completed, now)?;
        self.log_task_event(task_id, now, "completed: review approved");
        self.executor
            .notify("Task completed", &format!("Task {task_id} completed; PR ready for review"))
            .await?;
        Ok(())
    }

    async fn handle_review_denied(&self, task_id: &TaskId, feedback: &str) -> Result<(), EngineError> {
        let task = self.store.get_task(task_id.as_str()).ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;
        if task.status != TaskStatus::Review {
            return Ok(());
        }
        let now = self.executor.clock().now_ms();
        self.store.update_task_status(task_id.as_str(), TaskStatus::InProgress, now)?;
        self.log_task_event(task_id, now, &format!("in_progress: review denied, feedback: {feedback}"));

        if let Some(worker_id) = &task.worker_id {
            if let Some(worker) = self.store.get_worker(worker_id.as_str()) {
                if let Some(pane) = &worker.pane_handle {
                    self.executor.send_to_pane(pane, &format!("Review feedback: {feedback}")).await?;
                }
            }
        }
        Ok(())
    }

    /// On retry-ceiling exhaustion: best-effort workspace cleanup, then fail the Task.
    async fn fail_event_task(&self, event: &Event, reason: &str) {
        let now = self.executor.clock().now_ms();
        if let Some(task) = self.store.get_task(event.task_id.as_str()) {
            if let Some(path) = &task.worktree_path {
                let _ = self.executor.remove_workspace(path).await;
            }
        }
        let _ = self.store.fail_task(event.task_id.as_str(), reason.to_string(), now);
        self.log_task_event(&event.task_id, now, &format!("failed: {reason}"));
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
