// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the CLI and the daemon.
//!
//! Wire format: 4-byte big-endian length prefix + JSON payload.

use aio_core::{Task, ToolError};
use aio_engine::CommandOutput;
use serde::{Deserialize, Serialize};

#[path = "protocol_wire.rs"]
pub mod wire;

/// Request from CLI (or an agent process) to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check.
    Ping,

    /// Planner: create a Task.
    SubmitTask {
        description: String,
        #[serde(default)]
        context: Option<String>,
        #[serde(default)]
        branch_name: Option<String>,
    },

    /// Planner: list all Tasks.
    ListTasks,

    /// Direct read-only inspection: every worker bound to a live task.
    ListWorkers,

    /// Worker: refresh the caller's heartbeat.
    Heartbeat { worker_id: String },

    /// Worker: persist a status line.
    Progress { worker_id: String, status: String, message: String },

    /// Worker: push the branch and open a PR.
    CreatePr {
        worker_id: String,
        title: String,
        body: String,
        summary: String,
    },

    /// Worker: poll for unprocessed events targeted at its task.
    CheckEvents { worker_id: String },

    /// Worker: run a shell command through the SafetyGuard.
    ExecuteCommand {
        worker_id: String,
        cmd: String,
        cwd: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
        #[serde(default)]
        background: bool,
    },

    /// Reviewer: claim the oldest unclaimed Task in review.
    ClaimNextReview,

    /// Reviewer: resolve a claimed review.
    SubmitReview {
        task_id: String,
        approved: bool,
        #[serde(default)]
        feedback: Option<String>,
    },

    /// Administrative: forcibly terminate a worker.
    EmergencyStop { worker_id: String, reason: String },

    /// Daemon status summary.
    Status,

    /// Request graceful shutdown.
    Shutdown,
}

/// Response from the daemon back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Pong,
    Ok,
    TaskId { task_id: String },
    Tasks { tasks: Vec<Task> },
    Task { task: Option<Task> },
    Workers { workers: Vec<aio_core::Worker> },
    Events {
        events: Vec<aio_core::Event>,
        should_terminate: bool,
    },
    CommandResult(CommandOutput),
    PrUrl { pr_url: String },
    Status {
        uptime_secs: u64,
        tasks_active: usize,
        workers_active: usize,
        orphans_reconciled: usize,
    },
    ShuttingDown,
    Error { error: ToolError },
}

impl From<ToolError> for Response {
    fn from(error: ToolError) -> Self {
        Response::Error { error }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
