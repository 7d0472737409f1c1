// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::client::Client;
use crate::output;
use aio_daemon::{Request, Response};
use anyhow::{bail, Result};

pub async fn list(client: &Client) -> Result<()> {
    match client.call(Request::ListTasks).await? {
        Response::Tasks { tasks } => {
            output::print_tasks(&tasks);
            Ok(())
        }
        Response::Error { error } => bail!("{error}"),
        other => bail!("unexpected response: {other:?}"),
    }
}

pub async fn show(client: &Client, task_id: &str) -> Result<()> {
    match client.call(Request::ListTasks).await? {
        Response::Tasks { tasks } => match tasks.into_iter().find(|t| t.id.as_str() == task_id || t.id.short() == task_id) {
            Some(task) => {
                output::print_task_detail(&task);
                Ok(())
            }
            None => bail!("no such task: {task_id}"),
        },
        Response::Error { error } => bail!("{error}"),
        other => bail!("unexpected response: {other:?}"),
    }
}
