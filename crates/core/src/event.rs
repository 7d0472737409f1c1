// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The durable event envelope and its typed payloads.
//!
//! Events are append-only and immutable once written; `processed` lives
//! alongside the event in the log but is owned exclusively by the
//! orchestrator loop (see `aio-engine`).

use crate::id::{EventId, TaskId};
use serde::{Deserialize, Serialize};

/// One durable, append-only fact in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Monotonic, dense, 1-based sequence number assigned at append time.
    pub seq: u64,
    pub created_at_ms: i64,
    pub task_id: TaskId,
    pub payload: EventPayload,
    /// Owned solely by the orchestrator loop; never set by ToolSurface.
    #[serde(default)]
    pub processed: bool,
}

impl Event {
    /// Stable name for logging ("task-create", "review-requested", ...).
    pub fn name(&self) -> &'static str {
        self.payload.name()
    }
}

/// The typed body of an event. Serializes as `{"type": "task-create", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    #[serde(rename = "task-create")]
    TaskCreate {
        task_id: TaskId,
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
        branch_name: String,
    },
    #[serde(rename = "review-requested")]
    ReviewRequested {
        task_id: TaskId,
        pr_url: String,
        summary: String,
    },
    #[serde(rename = "review-approved")]
    ReviewApproved { task_id: TaskId },
    #[serde(rename = "review-denied")]
    ReviewDenied { task_id: TaskId, feedback: String },
}

impl EventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::TaskCreate { .. } => "task-create",
            EventPayload::ReviewRequested { .. } => "review-requested",
            EventPayload::ReviewApproved { .. } => "review-approved",
            EventPayload::ReviewDenied { .. } => "review-denied",
        }
    }

    pub fn task_id(&self) -> &TaskId {
        match self {
            EventPayload::TaskCreate { task_id, .. }
            | EventPayload::ReviewRequested { task_id, .. }
            | EventPayload::ReviewApproved { task_id }
            | EventPayload::ReviewDenied { task_id, .. } => task_id,
        }
    }

    /// A short human-readable summary for activity logs.
    pub fn log_summary(&self) -> String {
        match self {
            EventPayload::TaskCreate { task_id, description, .. } => {
                format!("task-create {task_id}: {description}")
            }
            EventPayload::ReviewRequested { task_id, pr_url, .. } => {
                format!("review-requested {task_id}: {pr_url}")
            }
            EventPayload::ReviewApproved { task_id } => {
                format!("review-approved {task_id}")
            }
            EventPayload::ReviewDenied { task_id, feedback } => {
                format!("review-denied {task_id}: {feedback}")
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
