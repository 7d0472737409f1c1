// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-level tunables. Loaded from environment variables by the daemon
//! at startup; everything has a default so the daemon runs unconfigured.

const HEARTBEAT_TIMEOUT_MS_DEFAULT: i64 = 30_000;
const POLL_INTERVAL_MS_DEFAULT: u64 = 1_000;
const MAX_COMMAND_OUTPUT_BYTES_DEFAULT: usize = 64 * 1024;
const MAX_EVENT_RETRIES_DEFAULT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// A worker whose heartbeat is older than this is considered dead.
    pub heartbeat_timeout_ms: i64,
    /// How often the orchestrator loop wakes up when there's nothing pending.
    pub poll_interval_ms: u64,
    /// `execute_command` output past this size is truncated with a marker.
    pub max_command_output_bytes: usize,
    /// Consecutive dispatch failures for one event before its Task is failed.
    pub max_event_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_ms: HEARTBEAT_TIMEOUT_MS_DEFAULT,
            poll_interval_ms: POLL_INTERVAL_MS_DEFAULT,
            max_command_output_bytes: MAX_COMMAND_OUTPUT_BYTES_DEFAULT,
            max_event_retries: MAX_EVENT_RETRIES_DEFAULT,
        }
    }
}

impl EngineConfig {
    /// Reads `AIO_HEARTBEAT_TIMEOUT_MS`, `AIO_POLL_INTERVAL_MS`,
    /// `AIO_MAX_COMMAND_OUTPUT_BYTES`, and `AIO_MAX_EVENT_RETRIES`, falling
    /// back to defaults for any variable that's unset or doesn't parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            heartbeat_timeout_ms: env_i64("AIO_HEARTBEAT_TIMEOUT_MS", defaults.heartbeat_timeout_ms),
            poll_interval_ms: env_u64("AIO_POLL_INTERVAL_MS", defaults.poll_interval_ms),
            max_command_output_bytes: env_usize("AIO_MAX_COMMAND_OUTPUT_BYTES", defaults.max_command_output_bytes),
            max_event_retries: env_u32("AIO_MAX_EVENT_RETRIES", defaults.max_event_retries),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
