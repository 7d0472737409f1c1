// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

pub fn daemon_binary() -> Option<String> {
    std::env::var("AIO_DAEMON_BINARY").ok()
}

/// Command typed into the user's pane to launch the Planner agent.
/// Overridable since the Planner is an opaque external LM process.
pub fn planner_cmd() -> String {
    std::env::var("AIO_PLANNER_CMD").unwrap_or_else(|_| "claude".to_string())
}

pub fn cargo_manifest_dir() -> Option<String> {
    std::env::var("CARGO_MANIFEST_DIR").ok()
}

pub fn timeout_connect_ms() -> Duration {
    parse_duration_ms("AIO_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

pub fn connect_poll_ms() -> Duration {
    parse_duration_ms("AIO_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

pub fn timeout_exit_ms() -> Duration {
    parse_duration_ms("AIO_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(5))
}
