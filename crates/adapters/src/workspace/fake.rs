// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fake workspace backend for tests: tracks paths/branches/PR URLs in
//! memory, never touches the filesystem or a real git repository.

use super::{WorkspaceBackend, WorkspaceError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    /// worker_id -> path
    workspaces: HashMap<String, String>,
    /// branch names that have been created at least once.
    branches: HashSet<String>,
    pushed: HashSet<String>,
    next_pr: u64,
}

#[derive(Clone, Default)]
pub struct FakeWorkspaceBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeWorkspaceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, worker_id: &str) -> bool {
        self.inner.lock().workspaces.contains_key(worker_id)
    }

    pub fn was_pushed(&self, branch_name: &str) -> bool {
        self.inner.lock().pushed.contains(branch_name)
    }
}

#[async_trait]
impl WorkspaceBackend for FakeWorkspaceBackend {
    async fn create_workspace(&self, worker_id: &str, branch_name: &str) -> Result<String, WorkspaceError> {
        let mut inner = self.inner.lock();
        if let Some(path) = inner.workspaces.get(worker_id) {
            return Ok(path.clone());
        }
        inner.branches.insert(branch_name.to_string());
        let path = format!("/fake/.worktrees/{worker_id}");
        inner.workspaces.insert(worker_id.to_string(), path.clone());
        Ok(path)
    }

    async fn push_branch(&self, _path: &str, branch_name: &str) -> Result<(), WorkspaceError> {
        self.inner.lock().pushed.insert(branch_name.to_string());
        Ok(())
    }

    async fn open_pr(&self, _path: &str, _title: &str, _body: &str) -> Result<String, WorkspaceError> {
        let mut inner = self.inner.lock();
        inner.next_pr += 1;
        Ok(format!("https://example.invalid/pr/{}", inner.next_pr))
    }

    async fn remove_workspace(&self, path: &str) -> Result<(), WorkspaceError> {
        let mut inner = self.inner.lock();
        inner.workspaces.retain(|_, p| p != path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
