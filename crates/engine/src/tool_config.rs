// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Renders the per-role tool configuration files consumed by the external
//! agent host: one stdio-spawned tool server per role, its env, and its
//! command line. Regenerated every time the daemon starts up, so a stale
//! file from a previous session (different socket path, different state
//! dir) never lingers.

use crate::paths;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Every role that gets its own generated tool configuration.
pub const ROLES: [&str; 4] = ["planner", "orchestrator", "reviewer", "worker"];

const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ToolServerConfig<'a> {
    version: u32,
    role: &'a str,
    command: &'a str,
    args: Vec<&'a str>,
    env: Vec<(&'a str, String)>,
}

fn render<'a>(role: &'a str, socket_path: &Path) -> ToolServerConfig<'a> {
    ToolServerConfig {
        version: CONFIG_VERSION,
        role,
        command: "aio",
        args: vec!["tool-server"],
        env: vec![("AIO_SOCKET_PATH", socket_path.display().to_string()), ("AIO_ROLE", role.to_string())],
    }
}

/// Writes `.aio/.generated/<role>.json` for every role, overwriting
/// whatever a previous run left behind.
pub fn write_generated_tool_configs(state_dir: &Path, socket_path: &Path) -> io::Result<()> {
    for role in ROLES {
        let path = paths::generated_tool_config_path(state_dir, role);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let config = render(role, socket_path);
        let body = serde_json::to_vec_pretty(&config).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, body)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tool_config_tests.rs"]
mod tests;
