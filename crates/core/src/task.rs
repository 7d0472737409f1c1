// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task record and its lifecycle.

use crate::id::{TaskId, WorkerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a Task in its lifecycle.
///
/// Legal transitions: `pending -> in_progress`, `in_progress -> review`,
/// `review -> in_progress`, `review -> completed`, `* -> failed` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Review,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether `self -> next` is a legal transition per the task-lifecycle invariant.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        if next == Failed {
            return self != Completed && self != Failed;
        }
        matches!(
            (self, next),
            (Pending, InProgress) | (InProgress, Review) | (Review, InProgress) | (Review, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub status: TaskStatus,
    #[serde(default)]
    pub worker_id: Option<WorkerId>,
    pub description: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub worktree_path: Option<String>,
    pub branch_name: String,
    #[serde(default)]
    pub pr_url: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Task {
    pub fn new(
        id: TaskId,
        description: String,
        context: Option<String>,
        branch_name: String,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            worker_id: None,
            description,
            context,
            worktree_path: None,
            branch_name,
            pr_url: None,
            failure_reason: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Applies a status transition, returning `false` (no-op) if illegal.
    /// Illegal transitions are logged by the caller, not silently dropped.
    pub fn transition_to(&mut self, next: TaskStatus, now_ms: i64) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at_ms = now_ms;
        true
    }

    pub fn fail(&mut self, reason: impl Into<String>, now_ms: i64) {
        self.status = TaskStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.updated_at_ms = now_ms;
    }

    pub fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
