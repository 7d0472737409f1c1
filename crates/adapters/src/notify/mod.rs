// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop-notification adapters.
//!
//! There is deliberately no secondary message-bus adapter here: every
//! cross-process signal in this system flows through the durable event log
//! plus pane wake-ups (see the orchestrator loop and notifier). A
//! notification is a one-shot, best-effort nudge to the user, nothing more.

mod desktop;
mod noop;

pub use desktop::DesktopNotifyAdapter;
pub use noop::NoOpNotifyAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for delivering an OS-level desktop notification.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}
