// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Store: the single serializable writer over the WAL and the
//! materialized Task/Worker/cursor state. One `Store` per process, wrapped
//! in an `Arc` and shared by every component that needs to read or write.

use crate::snapshot::Snapshot;
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use aio_core::{Event, EventPayload, Task, TaskId, TaskStatus, Worker, WorkerId, WorkerStatus};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),
    #[error("not found: {0}")]
    NotFound(String),
}

pub struct Store {
    inner: Mutex<Inner>,
    snapshot_path: PathBuf,
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
    /// Events with `processed=false`, kept in `seq` order. Populated from the
    /// WAL tail on open and by every `append_event`; drained by
    /// `mark_processed`. This is the EventLog's in-memory working set -- the
    /// WAL file remains the durable source of truth.
    pending: VecDeque<Event>,
}

impl Store {
    /// Open (or create) the store rooted at `state_dir`, replaying the
    /// snapshot (if any) plus the WAL tail, or the whole WAL if no snapshot
    /// exists yet.
    pub fn open(state_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let state_dir = state_dir.as_ref();
        let wal_path = state_dir.join("store.wal");
        let snapshot_path = crate::snapshot::default_snapshot_path(state_dir);

        let (wal, wal_events) = Wal::open(&wal_path)?;
        let mut state = Snapshot::read(&snapshot_path)?.unwrap_or_default();
        let mut pending = VecDeque::new();

        for event in wal_events {
            if event.seq > state.processed_seq {
                apply_replay(&mut state, &event);
                if !event.processed {
                    pending.push_back(event);
                }
            }
        }
        state.processed_seq = wal.processed_seq();

        Ok(Store {
            inner: Mutex::new(Inner { wal, state, pending }),
            snapshot_path,
        })
    }

    // --- EventLog ---

    pub fn append_event(&self, task_id: TaskId, payload: EventPayload, now_ms: i64) -> Result<Event, StoreError> {
        let mut inner = self.inner.lock();
        let event = inner.wal.append(task_id, payload, now_ms)?;
        inner.pending.push_back(event.clone());
        Ok(event)
    }

    /// Events with `processed=false`, ordered by `seq` ascending.
    pub fn unprocessed_events(&self, limit: usize) -> Vec<Event> {
        let inner = self.inner.lock();
        inner.pending.iter().take(limit).cloned().collect()
    }

    pub fn mark_processed(&self, seq: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.wal.mark_processed(seq)?;
        inner.state.processed_seq = seq;
        inner.pending.retain(|e| e.seq != seq);
        Ok(())
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        Ok(self.inner.lock().wal.flush()?)
    }

    /// Write a snapshot of the current materialized state and compact the
    /// WAL to only events not yet folded into it. Safe to call at any time;
    /// it's an optimization, not a correctness requirement.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        Snapshot::write(&self.snapshot_path, &inner.state)?;
        let seq = inner.state.processed_seq;
        let remaining: Vec<Event> = inner.pending.iter().cloned().collect();
        inner.wal.truncate_before(seq, &remaining)?;
        Ok(())
    }

    // --- Task operations ---

    pub fn upsert_task(&self, task: Task) {
        self.inner.lock().state.upsert_task(task);
    }

    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.inner.lock().state.get_task(id).cloned()
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.inner.lock().state.list_tasks().into_iter().cloned().collect()
    }

    pub fn update_task_status(&self, id: &str, status: TaskStatus, now_ms: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .get_task_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        Ok(task.transition_to(status, now_ms))
    }

    pub fn fail_task(&self, id: &str, reason: impl Into<String>, now_ms: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .get_task_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        task.fail(reason, now_ms);
        Ok(())
    }

    pub fn set_pr_url(&self, id: &str, pr_url: String, now_ms: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .get_task_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        task.pr_url = Some(pr_url);
        task.updated_at_ms = now_ms;
        Ok(())
    }

    pub fn set_task_worker(&self, id: &str, worker_id: Option<WorkerId>, now_ms: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .get_task_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        task.worker_id = worker_id;
        task.updated_at_ms = now_ms;
        Ok(())
    }

    pub fn set_task_workspace(&self, id: &str, worktree_path: Option<String>, now_ms: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .get_task_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        task.worktree_path = worktree_path;
        task.updated_at_ms = now_ms;
        Ok(())
    }

    // --- Worker operations ---

    pub fn register_worker(&self, worker: Worker) {
        self.inner.lock().state.register_worker(worker);
    }

    pub fn get_worker(&self, id: &str) -> Option<Worker> {
        self.inner.lock().state.get_worker(id).cloned()
    }

    pub fn list_active_workers(&self) -> Vec<Worker> {
        self.inner.lock().state.list_active_workers().into_iter().cloned().collect()
    }

    pub fn worker_for_task(&self, task_id: &str) -> Option<Worker> {
        self.inner.lock().state.worker_for_task(task_id).cloned()
    }

    pub fn update_heartbeat(&self, id: &str, now_ms: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let worker = inner
            .state
            .get_worker_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("worker {id}")))?;
        worker.heartbeat(now_ms);
        Ok(())
    }

    pub fn set_worker_status(&self, id: &str, status: WorkerStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let worker = inner
            .state
            .get_worker_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("worker {id}")))?;
        worker.status = status;
        Ok(())
    }

    pub fn remove_worker(&self, id: &str) -> Option<Worker> {
        self.inner.lock().state.remove_worker(id)
    }

    // --- Delivery cursors ---

    pub fn cursor_get(&self, recipient: &str) -> u64 {
        self.inner.lock().state.cursor_get(recipient)
    }

    pub fn cursor_put(&self, recipient: &str, seq: u64) {
        self.inner.lock().state.cursor_put(recipient, seq);
    }

    pub fn cursor_remove(&self, recipient: &str) {
        self.inner.lock().state.cursor_remove(recipient);
    }

    // --- Reviewer pane ---

    pub fn reviewer_pane(&self) -> Option<String> {
        self.inner.lock().state.reviewer_pane.clone()
    }

    pub fn set_reviewer_pane(&self, handle: Option<String>) {
        self.inner.lock().state.set_reviewer_pane(handle);
    }

    pub fn snapshot_state(&self) -> MaterializedState {
        self.inner.lock().state.clone()
    }

    pub fn max_seq(&self) -> u64 {
        self.inner.lock().wal.write_seq()
    }
}

/// Applies a replayed WAL event to rebuild materialized state on startup.
/// This mirrors (in miniature) what the orchestrator loop's handlers do
/// live, but purely as data replay -- it never re-runs side effects, and
/// status transitions for review-approved/denied are left for the loop to
/// redo when it re-dispatches the (still-unprocessed) event itself.
fn apply_replay(state: &mut MaterializedState, event: &Event) {
    if let EventPayload::TaskCreate {
        task_id,
        description,
        context,
        branch_name,
    } = &event.payload
    {
        if state.get_task(task_id.as_str()).is_none() {
            state.upsert_task(Task::new(
                task_id.clone(),
                description.clone(),
                context.clone(),
                branch_name.clone(),
                event.created_at_ms,
            ));
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
