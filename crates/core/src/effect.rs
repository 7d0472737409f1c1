// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Side effects the orchestrator loop asks the executor to perform.
//!
//! Handlers never touch adapters directly: they compute a list of `Effect`s
//! and return them, keeping the dispatch logic itself synchronous and
//! trivially testable. The executor (in `aio-engine`) is the only thing
//! that talks to `SessionAdapter`/`NotifyAdapter`/the workspace backend.

use crate::event::EventPayload;
use crate::id::{TaskId, WorkerId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    /// Append a new event to the durable log.
    Emit { payload: EventPayload },

    /// Create an isolated working tree for a worker, branched off the
    /// default line. Reuses an existing branch of the same name.
    CreateWorkspace {
        task_id: TaskId,
        worker_id: WorkerId,
        branch_name: String,
    },
    /// Remove a worker's working tree. Never touches the shared repository.
    RemoveWorkspace { worker_id: WorkerId, path: String },

    /// Open a terminal pane running the worker agent.
    OpenWorkerPane {
        worker_id: WorkerId,
        task_id: TaskId,
        cwd: String,
        env: Vec<(String, String)>,
    },
    /// Open a terminal pane running the (singleton, on-demand) reviewer agent.
    OpenReviewerPane,
    /// Send a textual wake-up hint into an existing pane.
    SendToPane { handle: String, text: String },
    /// Kill a pane/session.
    ClosePane { handle: String },

    /// Set a named timer to fire after `after`.
    SetTimer { name: String, after: Duration },
    /// Cancel a previously set timer.
    CancelTimer { name: String },

    /// Deliver an OS-level desktop notification to the user.
    Notify { title: String, message: String },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit { payload } => payload.name(),
            Effect::CreateWorkspace { .. } => "create_workspace",
            Effect::RemoveWorkspace { .. } => "remove_workspace",
            Effect::OpenWorkerPane { .. } => "open_worker_pane",
            Effect::OpenReviewerPane => "open_reviewer_pane",
            Effect::SendToPane { .. } => "send_to_pane",
            Effect::ClosePane { .. } => "close_pane",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Notify { .. } => "notify",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
