// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory materialized view over the event log: the current Task/Worker
//! rows and delivery cursors, rebuilt by replaying the WAL (or a snapshot
//! plus its WAL tail) at startup.

use aio_core::{Task, TaskId, Worker, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializedState {
    pub tasks: HashMap<TaskId, Task>,
    pub workers: HashMap<WorkerId, Worker>,
    /// Per-recipient high-water mark of wake-ups already delivered.
    pub cursors: HashMap<String, u64>,
    /// Last seq processed by the orchestrator loop; mirrors `Wal::processed_seq`
    /// so a snapshot alone is enough to resume without rescanning the WAL.
    pub processed_seq: u64,
    /// Handle of the singleton, on-demand reviewer pane, if one has been opened.
    #[serde(default)]
    pub reviewer_pane: Option<String>,
}

impl MaterializedState {
    pub fn upsert_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn list_tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by_key(|t| t.created_at_ms);
        tasks
    }

    pub fn register_worker(&mut self, worker: Worker) {
        self.workers.insert(worker.id.clone(), worker);
    }

    pub fn get_worker(&self, id: &str) -> Option<&Worker> {
        self.workers.get(id)
    }

    pub fn get_worker_mut(&mut self, id: &str) -> Option<&mut Worker> {
        self.workers.get_mut(id)
    }

    pub fn list_active_workers(&self) -> Vec<&Worker> {
        self.workers.values().collect()
    }

    pub fn remove_worker(&mut self, id: &str) -> Option<Worker> {
        self.workers.remove(id)
    }

    /// Worker currently bound to `task_id`, if any. Used to enforce the
    /// worker-exclusivity invariant (at most one live worker per task).
    pub fn worker_for_task(&self, task_id: &str) -> Option<&Worker> {
        self.workers.values().find(|w| {
            w.task_id.as_ref().map(|t| t.as_str()) == Some(task_id)
        })
    }

    pub fn cursor_get(&self, recipient: &str) -> u64 {
        self.cursors.get(recipient).copied().unwrap_or(0)
    }

    /// Cursors only increase; a stale `put` (lower than current) is ignored.
    pub fn cursor_put(&mut self, recipient: &str, seq: u64) {
        let entry = self.cursors.entry(recipient.to_string()).or_insert(0);
        if seq > *entry {
            *entry = seq;
        }
    }

    /// Stop tracking a recipient entirely, e.g. after its pane is found gone.
    pub fn cursor_remove(&mut self, recipient: &str) {
        self.cursors.remove(recipient);
    }

    pub fn set_reviewer_pane(&mut self, handle: Option<String>) {
        self.reviewer_pane = handle;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
