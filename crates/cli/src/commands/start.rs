// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `aio start` — allocates a session, launches the Orchestrator daemon in
//! a new adjacent pane (spawning it if it isn't already running), then
//! types the Planner agent's launch command into the caller's own pane.
//!
//! Pane placement depends on `$TMUX_PANE`: tmux sets it for every process
//! running inside one of its panes, and it's the only handle this command
//! has for "the pane the user is looking at" (`PaneAdapter` can split or
//! open a pane but has no "attach to the pane I'm already in" primitive).
//! Outside tmux there's no pane to split or inject into, so `start` falls
//! back to spawning the daemon detached in the background and leaves
//! launching the Planner to the caller.

use crate::client::{probe_socket, Client};
use crate::{daemon_process, env};
use anyhow::{bail, Result};
use std::time::Instant;

pub async fn run(client: &Client) -> Result<()> {
    let config = client.config();
    let current_pane = std::env::var("TMUX_PANE").ok();

    if !probe_socket(&config.socket_path) {
        let started_in_pane = match &current_pane {
            Some(pane) => daemon_process::start_daemon_in_adjacent_pane(config, pane).await.is_ok(),
            None => false,
        };

        if !started_in_pane {
            client.ensure_daemon_running().await?;
        } else {
            let deadline = Instant::now() + env::timeout_connect_ms();
            while Instant::now() < deadline {
                if probe_socket(&config.socket_path) {
                    break;
                }
                tokio::time::sleep(env::connect_poll_ms()).await;
            }
            if !probe_socket(&config.socket_path) {
                bail!("orchestrator pane was opened but the daemon never came up");
            }
        }
    }

    println!("session {} ready", config.session_id);
    println!("store:  {}", config.state_dir.display());
    println!("socket: {}", config.socket_path.display());

    match &current_pane {
        Some(pane) => daemon_process::launch_planner_in_pane(config, pane).await?,
        None => println!("not running inside tmux; launch the planner yourself with `{}`", env::planner_cmd()),
    }

    Ok(())
}
