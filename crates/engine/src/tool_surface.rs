// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The role-scoped operation set agents call into: Planner submits and lists
//! Tasks, Worker reports progress and opens PRs, Reviewer claims and
//! resolves reviews. Every failure is converted to a `ToolError` here --
//! agents never see an internal `thiserror` type.

use crate::config::EngineConfig;
use crate::executor::{ExecuteError, Executor};
use crate::paths;
use crate::safety_guard::SafetyGuard;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::{Clock, Event, EventPayload, IdGen, Task, TaskId, TaskStatus, ToolError, ToolErrorCode};
use aio_storage::{Store, StoreError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout applied to `execute_command` when the caller doesn't
/// specify one.
const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 30_000;

const TRUNCATION_MARKER: &str = "\n...[truncated]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEventsResult {
    pub events: Vec<Event>,
    pub should_terminate: bool,
}

pub struct ToolSurface<W, P, N, C: Clock> {
    store: Arc<Store>,
    executor: Executor<W, P, N, C>,
    id_gen: Arc<dyn IdGen>,
    config: EngineConfig,
    state_dir: PathBuf,
    safety_guard: SafetyGuard,
    claimed_reviews: Mutex<HashSet<String>>,
}

impl<W, P, N, C> ToolSurface<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(store: Arc<Store>, executor: Executor<W, P, N, C>, id_gen: Arc<dyn IdGen>, config: EngineConfig, state_dir: PathBuf) -> Self {
        Self {
            store,
            executor,
            id_gen,
            config,
            state_dir,
            safety_guard: SafetyGuard::default(),
            claimed_reviews: Mutex::new(HashSet::new()),
        }
    }

    // --- Planner ---

    pub fn submit_task(&self, description: String, context: Option<String>, branch_name: Option<String>) -> Result<TaskId, ToolError> {
        if description.trim().is_empty() {
            return Err(ToolError::invalid_argument("description must not be empty"));
        }
        let now = self.executor.clock().now_ms();
        let task_id = TaskId::new(self.id_gen.next_id("t"));
        let branch_name = branch_name.unwrap_or_else(|| format!("task/{}", task_id.short()));

        let task = Task::new(task_id.clone(), description.clone(), context.clone(), branch_name.clone(), now);
        self.store.upsert_task(task);
        self.store
            .append_event(
                task_id.clone(),
                EventPayload::TaskCreate {
                    task_id: task_id.clone(),
                    description,
                    context,
                    branch_name,
                },
                now,
            )
            .map_err(storage_err)?;
        Ok(task_id)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.store.list_tasks()
    }

    /// Every worker bound to a live task, for direct read-only inspection.
    pub fn list_workers(&self) -> Vec<aio_core::Worker> {
        self.store.list_active_workers()
    }

    // --- Worker ---

    pub fn heartbeat(&self, worker_id: &str) -> Result<(), ToolError> {
        let now = self.executor.clock().now_ms();
        self.store.update_heartbeat(worker_id, now).map_err(storage_err)
    }

    /// Append a status line to the worker's log file. No event is appended;
    /// this is purely for after-the-fact debugging.
    pub fn progress(&self, worker_id: &str, status: &str, message: &str) -> Result<(), ToolError> {
        let now = self.executor.clock().now_ms();
        let path = paths::worker_log_path(&self.state_dir, worker_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&path).map_err(io_err)?;
        use std::io::Write;
        writeln!(file, "[{now}] {status}: {message}").map_err(io_err)
    }

    pub async fn create_pr(&self, worker_id: &str, title: &str, body: &str, summary: &str) -> Result<String, ToolError> {
        let worker = self
            .store
            .get_worker(worker_id)
            .ok_or_else(|| ToolError::not_found(format!("worker {worker_id}")))?;
        let task_id = worker
            .task_id
            .ok_or_else(|| ToolError::precondition_failed("worker has no bound task"))?;
        let task = self
            .store
            .get_task(task_id.as_str())
            .ok_or_else(|| ToolError::not_found(format!("task {task_id}")))?;

        // Idempotent only while this PR is still the live one: once a review
        // denial reopens the task to `InProgress`, a fresh `create_pr` call
        // must push again and raise a new `ReviewRequested`, not replay the
        // stale URL from the superseded round.
        if let Some(pr_url) = &task.pr_url {
            if matches!(task.status, TaskStatus::Review | TaskStatus::Completed) {
                return Ok(pr_url.clone());
            }
        }
        let path = task
            .worktree_path
            .clone()
            .ok_or_else(|| ToolError::precondition_failed("task has no workspace"))?;

        self.executor.push_branch(&path, &task.branch_name).await.map_err(execute_err)?;
        let pr_url = self.executor.open_pr(&path, title, body).await.map_err(execute_err)?;

        let now = self.executor.clock().now_ms();
        self.store.set_pr_url(task_id.as_str(), pr_url.clone(), now).map_err(storage_err)?;
        self.store
            .append_event(
                task_id.clone(),
                EventPayload::ReviewRequested {
                    task_id: task_id.clone(),
                    pr_url: pr_url.clone(),
                    summary: summary.to_string(),
                },
                now,
            )
            .map_err(storage_err)?;
        Ok(pr_url)
    }

    /// Unprocessed events belonging to the worker's bound task, plus whether
    /// the worker should stop polling because its task has reached a
    /// terminal status.
    pub fn check_events(&self, worker_id: &str) -> Result<CheckEventsResult, ToolError> {
        let worker = self
            .store
            .get_worker(worker_id)
            .ok_or_else(|| ToolError::not_found(format!("worker {worker_id}")))?;
        let Some(task_id) = worker.task_id else {
            return Ok(CheckEventsResult {
                events: Vec::new(),
                should_terminate: true,
            });
        };
        let events: Vec<Event> = self
            .store
            .unprocessed_events(usize::MAX)
            .into_iter()
            .filter(|e| e.task_id.as_str() == task_id.as_str())
            .collect();

        let should_terminate = self
            .store
            .get_task(task_id.as_str())
            .map(|t| t.status.is_terminal())
            .unwrap_or(true);

        Ok(CheckEventsResult { events, should_terminate })
    }

    pub async fn execute_command(
        &self,
        cmd: &str,
        cwd: &str,
        timeout_ms: Option<u64>,
        background: bool,
    ) -> Result<CommandOutput, ToolError> {
        if let Some(pattern) = self.safety_guard.check(cmd) {
            return Err(ToolError::blocked(format!("command matches deny pattern: {pattern}")));
        }

        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd).current_dir(cwd);

        if background {
            command.kill_on_drop(false);
            command.spawn().map_err(io_err)?;
            return Ok(CommandOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: false,
                stdout_truncated: false,
                stderr_truncated: false,
            });
        }

        let timeout = Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_COMMAND_TIMEOUT_MS));
        command.kill_on_drop(true);

        match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => {
                let (stdout, stdout_truncated) = cap_output(&output.stdout, self.config.max_command_output_bytes);
                let (stderr, stderr_truncated) = cap_output(&output.stderr, self.config.max_command_output_bytes);
                Ok(CommandOutput {
                    exit_code: output.status.code(),
                    stdout,
                    stderr,
                    timed_out: false,
                    stdout_truncated,
                    stderr_truncated,
                })
            }
            Ok(Err(e)) => Err(ToolError::transient_io(format!("failed to run command: {e}"))),
            Err(_elapsed) => Ok(CommandOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                timed_out: true,
                stdout_truncated: false,
                stderr_truncated: false,
            }),
        }
    }

    // --- Reviewer ---

    /// Oldest Task in `review` not already claimed by another reviewer call.
    pub fn claim_next_review(&self) -> Option<Task> {
        let mut claimed = self.claimed_reviews.lock();
        let next = self
            .store
            .list_tasks()
            .into_iter()
            .find(|t| t.status == TaskStatus::Review && !claimed.contains(t.id.as_str()));
        if let Some(task) = &next {
            claimed.insert(task.id.as_str().to_string());
        }
        next
    }

    pub fn submit_review(&self, task_id: &str, approved: bool, feedback: Option<String>) -> Result<(), ToolError> {
        let task = self.store.get_task(task_id).ok_or_else(|| ToolError::not_found(format!("task {task_id}")))?;
        if task.status != TaskStatus::Review {
            return Err(ToolError::precondition_failed(format!("task {task_id} is not in review")));
        }
        self.claimed_reviews.lock().remove(task_id);

        let now = self.executor.clock().now_ms();
        let payload = if approved {
            EventPayload::ReviewApproved { task_id: TaskId::new(task_id) }
        } else {
            EventPayload::ReviewDenied {
                task_id: TaskId::new(task_id),
                feedback: feedback.unwrap_or_default(),
            }
        };
        self.store.append_event(TaskId::new(task_id), payload, now).map_err(storage_err)?;
        Ok(())
    }

    // --- Administrative ---

    /// Synchronously kills the worker's pane, marks its task failed, and
    /// removes the worker row, recording `reason` on the task.
    pub async fn emergency_stop(&self, worker_id: &str, reason: &str) -> Result<(), ToolError> {
        let worker = self
            .store
            .get_worker(worker_id)
            .ok_or_else(|| ToolError::not_found(format!("worker {worker_id}")))?;
        let now = self.executor.clock().now_ms();

        if let Some(task_id) = &worker.task_id {
            self.store.fail_task(task_id.as_str(), reason.to_string(), now).map_err(storage_err)?;
            if let Some(task) = self.store.get_task(task_id.as_str()) {
                if let Some(path) = &task.worktree_path {
                    self.executor.remove_workspace(path).await.map_err(execute_err)?;
                }
            }
        }
        if let Some(pane) = &worker.pane_handle {
            self.executor.close_pane(pane).await.map_err(execute_err)?;
        }
        self.store.remove_worker(worker_id);
        Ok(())
    }
}

fn cap_output(bytes: &[u8], cap: usize) -> (String, bool) {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= cap {
        return (text.into_owned(), false);
    }
    let mut cut = cap.min(text.len());
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    (format!("{}{TRUNCATION_MARKER}", &text[..cut]), true)
}

fn storage_err(e: StoreError) -> ToolError {
    match e {
        StoreError::NotFound(what) => ToolError::not_found(what),
        other => ToolError::new(ToolErrorCode::TransientIo, other.to_string()),
    }
}

fn execute_err(e: ExecuteError) -> ToolError {
    ToolError::new(ToolErrorCode::TransientIo, e.to_string())
}

fn io_err(e: std::io::Error) -> ToolError {
    ToolError::new(ToolErrorCode::TransientIo, e.to_string())
}

#[cfg(test)]
#[path = "tool_surface_tests.rs"]
mod tests;
