// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux-backed pane adapter: every primitive shells out to the `tmux` CLI.

use super::{PaneAdapter, PaneError, SplitSide};
use crate::subprocess::{run_with_timeout, TMUX_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

#[derive(Clone, Default)]
pub struct TmuxPaneAdapter;

impl TmuxPaneAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaneAdapter for TmuxPaneAdapter {
    async fn open_pane(&self, initial_cwd: &Path, role_tag: &str, title: &str) -> Result<String, PaneError> {
        if !initial_cwd.exists() {
            return Err(PaneError::SpawnFailed(format!(
                "working directory does not exist: {}",
                initial_cwd.display()
            )));
        }

        let session_id = format!("aio-{role_tag}-{:x}", rand::random::<u64>());

        let mut cmd = Command::new("tmux");
        cmd.arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(&session_id)
            .arg("-c")
            .arg(initial_cwd);

        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux new-session")
            .await
            .map_err(PaneError::SpawnFailed)?;
        if !output.status.success() {
            return Err(PaneError::SpawnFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
        }

        let mut title_cmd = Command::new("tmux");
        title_cmd.args(["set-option", "-t", &session_id, "pane-title", title]);
        let _ = run_with_timeout(title_cmd, TMUX_TIMEOUT, "tmux set pane-title").await;

        Ok(session_id)
    }

    async fn send_text(&self, handle: &str, text: &str, submit: bool) -> Result<(), PaneError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["send-keys", "-t", handle, "-l", "--", text]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux send-keys")
            .await
            .map_err(PaneError::CommandFailed)?;
        if !output.status.success() {
            return Err(PaneError::NotFound(handle.to_string()));
        }

        if submit {
            let mut enter_cmd = Command::new("tmux");
            enter_cmd.args(["send-keys", "-t", handle, "Enter"]);
            let output = run_with_timeout(enter_cmd, TMUX_TIMEOUT, "tmux send Enter")
                .await
                .map_err(PaneError::CommandFailed)?;
            if !output.status.success() {
                return Err(PaneError::NotFound(handle.to_string()));
            }
        }
        Ok(())
    }

    async fn split_pane(&self, base_handle: &str, side: SplitSide) -> Result<String, PaneError> {
        let flag = match side {
            SplitSide::Horizontal => "-h",
            SplitSide::Vertical => "-v",
        };
        let new_id = format!("{base_handle}-split-{:x}", rand::random::<u64>());

        let mut cmd = Command::new("tmux");
        cmd.args(["split-window", flag, "-t", base_handle, "-d", "-P", "-F", "#{pane_id}"]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux split-window")
            .await
            .map_err(PaneError::SpawnFailed)?;
        if !output.status.success() {
            return Err(PaneError::SpawnFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
        }
        // tmux's own pane_id (the "#{pane_id}" it printed) is the real handle;
        // new_id above is only used if nothing was captured.
        let captured = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if captured.is_empty() { new_id } else { captured })
    }

    async fn close_pane(&self, handle: &str) -> Result<(), PaneError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", handle]);
        // kill-session on an unknown target is not an error for our purposes:
        // the desired end state (pane gone) already holds.
        let _ = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux kill-session").await;
        Ok(())
    }

    async fn is_alive(&self, handle: &str) -> Result<bool, PaneError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", handle]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux has-session")
            .await
            .map_err(PaneError::CommandFailed)?;
        Ok(output.status.success())
    }
}
