// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text table rendering for the CLI's read-only commands.

use aio_core::{Task, Worker};

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    println!("{:<14} {:<12} {:<10} {}", "ID", "STATUS", "WORKER", "DESCRIPTION");
    for task in tasks {
        println!(
            "{:<14} {:<12} {:<10} {}",
            task.id.short(),
            task.status,
            task.worker_id.as_ref().map(|w| w.short()).unwrap_or("-"),
            truncate(&task.description, 60),
        );
    }
}

pub fn print_task_detail(task: &Task) {
    println!("id:          {}", task.id);
    println!("status:      {}", task.status);
    println!("description: {}", task.description);
    println!("branch:      {}", task.branch_name);
    if let Some(worker_id) = &task.worker_id {
        println!("worker:      {worker_id}");
    }
    if let Some(path) = &task.worktree_path {
        println!("workspace:   {path}");
    }
    if let Some(pr_url) = &task.pr_url {
        println!("pr:          {pr_url}");
    }
    if let Some(reason) = &task.failure_reason {
        println!("failure:     {reason}");
    }
}

pub fn print_workers(workers: &[Worker]) {
    if workers.is_empty() {
        println!("no active workers");
        return;
    }
    println!("{:<14} {:<10} {:<14} {}", "ID", "STATUS", "TASK", "PANE");
    for worker in workers {
        println!(
            "{:<14} {:<10?} {:<14} {}",
            worker.id.short(),
            worker.status,
            worker.task_id.as_ref().map(|t| t.short()).unwrap_or("-"),
            worker.pane_handle.as_deref().unwrap_or("-"),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
