// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `git worktree`/`gh`-backed workspace implementation.

use super::{WorkspaceBackend, WorkspaceError};
use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

#[derive(Clone)]
pub struct GitWorktreeBackend {
    repo_root: PathBuf,
}

impl GitWorktreeBackend {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    async fn branch_exists(&self, branch_name: &str) -> bool {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.repo_root)
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{branch_name}")]);
        run_with_timeout(cmd, GIT_TIMEOUT, "git rev-parse")
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// The line worktrees fork from when a branch doesn't exist yet, e.g.
    /// `origin/main`. Falls back to `origin/main` if the remote HEAD symref
    /// can't be resolved (a fresh clone without a configured remote HEAD).
    async fn default_base(&self) -> String {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.repo_root)
            .args(["symbolic-ref", "--short", "refs/remotes/origin/HEAD"]);
        match run_with_timeout(cmd, GIT_TIMEOUT, "git symbolic-ref").await {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => "origin/main".to_string(),
        }
    }
}

#[async_trait]
impl WorkspaceBackend for GitWorktreeBackend {
    async fn create_workspace(&self, worker_id: &str, branch_name: &str) -> Result<String, WorkspaceError> {
        let path = self.repo_root.join(".worktrees").join(worker_id);
        let path_str = path.to_string_lossy().into_owned();

        if path.exists() {
            // Already materialized (idempotent re-dispatch after a crash).
            return Ok(path_str);
        }

        let mut cmd = Command::new("git");
        cmd.current_dir(&self.repo_root).arg("worktree").arg("add");

        if self.branch_exists(branch_name).await {
            cmd.arg(&path).arg(branch_name);
        } else {
            let base = self.default_base().await;
            cmd.arg("-b").arg(branch_name).arg(&path).arg(&base);
        }

        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree add")
            .await
            .map_err(WorkspaceError::Git)?;
        if !output.status.success() {
            return Err(WorkspaceError::Git(String::from_utf8_lossy(&output.stderr).into_owned()));
        }

        Ok(path_str)
    }

    async fn push_branch(&self, path: &str, branch_name: &str) -> Result<(), WorkspaceError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(path).args(["push", "--set-upstream", "origin", branch_name]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git push")
            .await
            .map_err(WorkspaceError::Git)?;
        if !output.status.success() {
            return Err(WorkspaceError::Git(String::from_utf8_lossy(&output.stderr).into_owned()));
        }
        Ok(())
    }

    async fn open_pr(&self, path: &str, title: &str, body: &str) -> Result<String, WorkspaceError> {
        let mut cmd = Command::new("gh");
        cmd.current_dir(path).args(["pr", "create", "--title", title, "--body", body, "--fill"]);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "gh pr create")
            .await
            .map_err(WorkspaceError::PrTool)?;
        if !output.status.success() {
            return Err(WorkspaceError::PrTool(String::from_utf8_lossy(&output.stderr).into_owned()));
        }
        let url = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next_back()
            .unwrap_or_default()
            .trim()
            .to_string();
        if url.is_empty() {
            return Err(WorkspaceError::PrTool("gh pr create produced no URL".into()));
        }
        Ok(url)
    }

    async fn remove_workspace(&self, path: &str) -> Result<(), WorkspaceError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.repo_root).args(["worktree", "remove", "--force", path]);
        // Best-effort: the worktree may already be gone (crash mid-teardown).
        let _ = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree remove").await;

        if tokio::fs::metadata(path).await.is_ok() {
            tokio::fs::remove_dir_all(path)
                .await
                .map_err(|e| WorkspaceError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
