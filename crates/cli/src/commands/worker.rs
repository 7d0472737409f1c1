// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::client::Client;
use crate::output;
use aio_daemon::{Request, Response};
use anyhow::{bail, Result};

pub async fn list(client: &Client) -> Result<()> {
    match client.call(Request::ListWorkers).await? {
        Response::Workers { workers } => {
            output::print_workers(&workers);
            Ok(())
        }
        Response::Error { error } => bail!("{error}"),
        other => bail!("unexpected response: {other:?}"),
    }
}
