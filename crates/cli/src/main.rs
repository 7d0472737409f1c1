// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `aio` — the thin client talking to the `aiod` daemon over its Unix
//! socket. `start` is the default subcommand when none is given.

mod client;
mod commands;
mod daemon_process;
mod env;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aio", about = "Multi-agent orchestration kernel client", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate a session and make sure the daemon is running (default).
    Start,
    /// Terminate the session (or all sessions with no argument).
    Stop { session_id: Option<String> },
    /// Print active sessions, task/worker counts, and store location.
    Status,
    /// Remove the `.aio/` tree; refuses while the daemon or a worker is active.
    Clean,
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Worker(WorkerCommand),
}

#[derive(Subcommand)]
enum TaskCommand {
    /// List every task.
    List,
    /// Show one task's detail.
    Show { task_id: String },
}

#[derive(Subcommand)]
enum WorkerCommand {
    /// List every active worker.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = client::Client::load()?;

    match cli.command.unwrap_or(Command::Start) {
        Command::Start => commands::start::run(&client).await,
        Command::Stop { session_id } => commands::stop::run(&client, session_id).await,
        Command::Status => commands::status::run(&client).await,
        Command::Clean => commands::clean::run(&client).await,
        Command::Task(TaskCommand::List) => commands::task::list(&client).await,
        Command::Task(TaskCommand::Show { task_id }) => commands::task::show(&client, &task_id).await,
        Command::Worker(WorkerCommand::List) => commands::worker::list(&client).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
