// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Finds and spawns the `aiod` binary: visibly, in a new adjacent tmux
//! pane when one is available, or detached in the background otherwise.

use crate::client::ClientError;
use aio_adapters::{PaneAdapter, SplitSide, TmuxPaneAdapter};
use aio_daemon::Config;
use std::path::PathBuf;
use std::process::Command;

pub fn start_daemon_background(config: &Config) -> Result<std::process::Child, ClientError> {
    std::fs::create_dir_all(&config.state_dir).map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
    let aiod_path = find_aiod_binary();

    Command::new(&aiod_path)
        .env("AIO_STATE_DIR", &config.state_dir)
        .env("AIO_REPO_ROOT", &config.repo_root)
        .env("AIO_PROJECT_ROOT", &config.project_root)
        .env("AIO_SESSION_ID", &config.session_id)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Splits `base_pane` (the pane `start` was invoked from) and runs `aiod`
/// in the new adjacent pane, so the Orchestrator daemon is visible the way
/// `start` is meant to make it. Returns an error if `base_pane` isn't a
/// live tmux pane, in which case the caller should fall back to
/// `start_daemon_background`.
pub async fn start_daemon_in_adjacent_pane(config: &Config, base_pane: &str) -> Result<String, ClientError> {
    std::fs::create_dir_all(&config.state_dir).map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
    let aiod_path = find_aiod_binary();
    let pane = TmuxPaneAdapter::new();

    let handle = pane
        .split_pane(base_pane, SplitSide::Vertical)
        .await
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;

    for (key, value) in [
        ("AIO_STATE_DIR", config.state_dir.display().to_string()),
        ("AIO_REPO_ROOT", config.repo_root.display().to_string()),
        ("AIO_PROJECT_ROOT", config.project_root.display().to_string()),
        ("AIO_SESSION_ID", config.session_id.clone()),
    ] {
        pane.send_text(&handle, &format!("export {key}={value}"), true)
            .await
            .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
    }
    pane.send_text(&handle, &aiod_path.display().to_string(), true)
        .await
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;

    Ok(handle)
}

/// Types the Planner agent's launch command into `pane_handle` (the pane
/// `start` was invoked from) and submits it, so the agent takes over the
/// user's own terminal pane.
pub async fn launch_planner_in_pane(config: &Config, pane_handle: &str) -> Result<(), ClientError> {
    let pane = TmuxPaneAdapter::new();

    for (key, value) in [
        ("AIO_STATE_DIR", config.state_dir.display().to_string()),
        ("AIO_REPO_ROOT", config.repo_root.display().to_string()),
        ("AIO_PROJECT_ROOT", config.project_root.display().to_string()),
        ("AIO_SESSION_ID", config.session_id.clone()),
    ] {
        pane.send_text(pane_handle, &format!("export {key}={value}"), true)
            .await
            .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
    }
    pane.send_text(pane_handle, &crate::env::planner_cmd(), true)
        .await
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Locate `aiod`: explicit override, then a debug-build sibling next to this
/// binary's `target/debug`, then a plain sibling of the current executable,
/// falling back to whatever `PATH` resolves.
pub fn find_aiod_binary() -> PathBuf {
    if let Some(path) = crate::env::daemon_binary() {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().ok();
    let is_debug_build = current_exe.as_ref().and_then(|p| p.to_str()).map(|s| s.contains("target/debug")).unwrap_or(false);

    if is_debug_build {
        if let Some(manifest_dir) = crate::env::cargo_manifest_dir() {
            let dev_path = PathBuf::from(manifest_dir).parent().and_then(|p| p.parent()).map(|p| p.join("target/debug/aiod"));
            if let Some(path) = dev_path {
                if path.exists() {
                    return path;
                }
            }
        }
    }

    if let Some(exe) = current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("aiod");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("aiod")
}

pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid)
}

pub fn stop_process(pid: u32) -> bool {
    kill_signal("-15", pid)
}

fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
