// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    pending_to_in_progress = { TaskStatus::Pending, TaskStatus::InProgress, true },
    in_progress_to_review = { TaskStatus::InProgress, TaskStatus::Review, true },
    review_to_in_progress = { TaskStatus::Review, TaskStatus::InProgress, true },
    review_to_completed = { TaskStatus::Review, TaskStatus::Completed, true },
    any_live_to_failed = { TaskStatus::InProgress, TaskStatus::Failed, true },
    pending_to_review_illegal = { TaskStatus::Pending, TaskStatus::Review, false },
    pending_to_completed_illegal = { TaskStatus::Pending, TaskStatus::Completed, false },
    completed_to_failed_illegal = { TaskStatus::Completed, TaskStatus::Failed, false },
    failed_to_anything_illegal = { TaskStatus::Failed, TaskStatus::Pending, false },
)]
fn transition_legality(from: TaskStatus, to: TaskStatus, expected: bool) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[test]
fn transition_to_applies_and_bumps_updated_at() {
    let mut task = Task::new(TaskId::new("t-1"), "desc".into(), None, "task/t1".into(), 0);
    assert!(task.transition_to(TaskStatus::InProgress, 10));
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.updated_at_ms, 10);
}

#[test]
fn transition_to_illegal_edge_is_noop() {
    let mut task = Task::new(TaskId::new("t-1"), "desc".into(), None, "task/t1".into(), 0);
    assert!(!task.transition_to(TaskStatus::Completed, 10));
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.updated_at_ms, 0);
}

#[test]
fn fail_is_terminal_and_records_reason() {
    let mut task = Task::new(TaskId::new("t-1"), "desc".into(), None, "task/t1".into(), 0);
    task.fail("heartbeat timeout", 30_000);
    assert_eq!(task.status, TaskStatus::Failed);
    assert_eq!(task.failure_reason.as_deref(), Some("heartbeat timeout"));
    assert!(!task.is_live());
}

#[test]
fn completed_task_has_no_live_worker_by_construction_contract() {
    // Task itself doesn't enforce cross-record invariants (that's the Store's
    // job), but completion should always be paired with clearing worker_id by
    // the caller — documented here so the contract doesn't drift silently.
    let mut task = Task::new(TaskId::new("t-1"), "desc".into(), None, "task/t1".into(), 0);
    task.worker_id = Some(WorkerId::new("w-1"));
    task.transition_to(TaskStatus::InProgress, 1);
    task.transition_to(TaskStatus::Review, 2);
    task.transition_to(TaskStatus::Completed, 3);
    task.worker_id = None;
    assert!(task.worker_id.is_none());
    assert!(task.status.is_terminal());
}
