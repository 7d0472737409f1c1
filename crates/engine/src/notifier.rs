// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! For each recipient (every live Worker, plus the reviewer if a pane is
//! open), compares the log's current `max_seq` against the recipient's
//! delivery cursor and nudges their pane if it's behind. Runs in parallel
//! with the orchestrator loop; only touches cursors, never Task/Worker rows.

use crate::executor::Executor;
use aio_adapters::{NotifyAdapter, PaneAdapter, WorkspaceBackend};
use aio_core::Clock;
use aio_storage::Store;
use std::sync::Arc;

const REVIEWER_RECIPIENT: &str = "reviewer";

pub struct Notifier<W, P, N, C: Clock> {
    store: Arc<Store>,
    executor: Executor<W, P, N, C>,
}

impl<W, P, N, C> Notifier<W, P, N, C>
where
    W: WorkspaceBackend,
    P: PaneAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(store: Arc<Store>, executor: Executor<W, P, N, C>) -> Self {
        Self { store, executor }
    }

    /// Check every tracked recipient once. Returns the number woken.
    pub async fn tick(&self) -> usize {
        let max_seq = self.store.max_seq();
        let mut woken = 0;

        for worker in self.store.list_active_workers() {
            let recipient = worker.id.as_str().to_string();
            if self.wake_if_stale(&recipient, worker.pane_handle.as_deref(), max_seq, "worker").await {
                woken += 1;
            }
        }

        if let Some(pane) = self.store.reviewer_pane() {
            if self.wake_if_stale(REVIEWER_RECIPIENT, Some(pane.as_str()), max_seq, "reviewer").await {
                woken += 1;
            }
        }

        woken
    }

    async fn wake_if_stale(&self, recipient: &str, pane: Option<&str>, max_seq: u64, role: &str) -> bool {
        if max_seq <= self.store.cursor_get(recipient) {
            return false;
        }
        let Some(pane) = pane else {
            self.store.cursor_remove(recipient);
            return false;
        };

        match self.executor.send_to_pane(pane, &wake_up_text(role)).await {
            Ok(()) => {
                self.store.cursor_put(recipient, max_seq);
                true
            }
            Err(e) => {
                tracing::warn!(recipient, pane, error = %e, "wake-up delivery failed, dropping recipient");
                self.store.cursor_remove(recipient);
                false
            }
        }
    }
}

fn wake_up_text(role: &str) -> String {
    match role {
        "reviewer" => "A pull request is waiting for review. Call check_events to see details.".to_string(),
        _ => "There is new activity on your task. Call check_events to see details.".to_string(),
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
