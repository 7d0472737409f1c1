// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Worker record: the process bound to exactly one live task at a time.

use crate::id::{TaskId, WorkerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub status: WorkerStatus,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub pane_handle: Option<String>,
    pub last_heartbeat_ms: i64,
}

impl Worker {
    pub fn new(id: WorkerId, task_id: TaskId, pane_handle: String, now_ms: i64) -> Self {
        Self {
            id,
            status: WorkerStatus::Running,
            task_id: Some(task_id),
            pane_handle: Some(pane_handle),
            last_heartbeat_ms: now_ms,
        }
    }

    /// Heartbeat is monotonic: never moves `last_heartbeat_ms` backward.
    pub fn heartbeat(&mut self, now_ms: i64) {
        if now_ms > self.last_heartbeat_ms {
            self.last_heartbeat_ms = now_ms;
        }
    }

    pub fn is_stale(&self, now_ms: i64, timeout_ms: i64) -> bool {
        now_ms - self.last_heartbeat_ms > timeout_ms
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
