// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker workspace management: an isolated git working tree, plus the
//! push/PR operations that get a worker's result in front of a reviewer.

mod git;

pub use git::GitWorktreeBackend;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWorkspaceBackend;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("git command failed: {0}")]
    Git(String),
    #[error("pr tool failed: {0}")]
    PrTool(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Owns per-task working directories. The backend that actually shells out
/// to `git`/`gh` is abstracted so it can be swapped for a deterministic fake
/// in tests, the same seam the pane and notify adapters use.
#[async_trait]
pub trait WorkspaceBackend: Clone + Send + Sync + 'static {
    /// Fork (or reuse, if `branch_name` already exists) a branch and
    /// materialize it at `.worktrees/<worker_id>`. Returns the absolute path.
    async fn create_workspace(&self, worker_id: &str, branch_name: &str) -> Result<String, WorkspaceError>;

    /// Publish `branch_name` to origin, setting upstream on first push.
    async fn push_branch(&self, path: &str, branch_name: &str) -> Result<(), WorkspaceError>;

    /// Open a PR from the pushed branch, returning its URL.
    async fn open_pr(&self, path: &str, title: &str, body: &str) -> Result<String, WorkspaceError>;

    /// Force-remove the working tree. Never touches the shared repository.
    async fn remove_workspace(&self, path: &str) -> Result<(), WorkspaceError>;
}
