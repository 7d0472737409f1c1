// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::client::{probe_socket, Client};
use aio_daemon::{Request, Response};
use anyhow::{bail, Result};

pub async fn run(client: &Client) -> Result<()> {
    let config = client.config();
    println!("store: {}", config.state_dir.display());

    if !probe_socket(&config.socket_path) {
        println!("daemon: not running");
        return Ok(());
    }

    match client.call(Request::Status).await? {
        Response::Status {
            uptime_secs,
            tasks_active,
            workers_active,
            orphans_reconciled,
        } => {
            println!("daemon: running (uptime {uptime_secs}s)");
            println!("tasks active:   {tasks_active}");
            println!("workers active: {workers_active}");
            println!("orphans reconciled since startup: {orphans_reconciled}");
            Ok(())
        }
        Response::Error { error } => bail!("{error}"),
        other => bail!("unexpected response: {other:?}"),
    }
}
