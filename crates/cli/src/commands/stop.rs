// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `aio stop [session_id]` — one daemon serves one session in this
//! implementation, so a mismatched `session_id` is reported rather than
//! silently ignored.

use crate::client::{probe_socket, Client, ClientError};
use aio_daemon::Request;
use anyhow::Result;

pub async fn run(client: &Client, session_id: Option<String>) -> Result<()> {
    let config = client.config();
    if let Some(requested) = &session_id {
        if requested != &config.session_id {
            println!("no running session matches '{requested}' (current session: {})", config.session_id);
            return Ok(());
        }
    }

    if !probe_socket(&config.socket_path) {
        println!("daemon is not running");
        return Ok(());
    }

    match client.call(Request::Shutdown).await {
        Ok(_) => {
            println!("stop requested");
            Ok(())
        }
        Err(ClientError::Connect(_)) => {
            println!("daemon is not running");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
