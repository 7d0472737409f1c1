// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time source abstraction so the orchestrator loop, heartbeat reaper, and
//! notifier cadence can be driven deterministically in tests.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of wall-clock time. `SystemClock` is used in production;
/// `FakeClock` lets tests advance time explicitly instead of sleeping.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Elapsed time between two `now_ms()` readings, saturating at zero.
    fn elapsed_ms(&self, since: i64) -> i64 {
        (self.now_ms() - since).max(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

/// Deterministic clock for tests. Starts at a fixed instant and only moves
/// when `advance` is called.
#[derive(Debug, Clone)]
pub struct FakeClock {
    now_ms: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now_ms: Arc::new(Mutex::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now_ms.lock() += by.as_millis() as i64;
    }

    pub fn set(&self, ms: i64) {
        *self.now_ms.lock() = ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        *self.now_ms.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
