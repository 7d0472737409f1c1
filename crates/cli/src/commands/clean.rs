// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `aio clean` — removes the `.aio/` tree, refusing while the daemon is
//! running or any worker is still active.

use crate::client::{probe_socket, Client};
use aio_daemon::{Request, Response};
use anyhow::{bail, Result};

pub async fn run(client: &Client) -> Result<()> {
    let config = client.config();

    if probe_socket(&config.socket_path) {
        match client.call(Request::Status).await? {
            Response::Status { workers_active, .. } if workers_active > 0 => {
                bail!("refusing to clean: {workers_active} worker(s) still active");
            }
            Response::Status { .. } => {
                bail!("refusing to clean: daemon is still running against {}; stop it first", config.state_dir.display());
            }
            Response::Error { error } => bail!("{error}"),
            other => bail!("unexpected response: {other:?}"),
        }
    }

    if !config.state_dir.exists() {
        println!("nothing to clean");
        return Ok(());
    }
    std::fs::remove_dir_all(&config.state_dir)?;
    println!("removed {}", config.state_dir.display());
    Ok(())
}
