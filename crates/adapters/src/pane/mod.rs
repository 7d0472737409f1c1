// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer adapters: the abstract interface the orchestrator
//! loop uses to give agents a visible, interactive home.

mod noop;
mod tmux;

pub use noop::NoOpPaneAdapter;
pub use tmux::TmuxPaneAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePane, FakePaneAdapter, PaneCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaneError {
    #[error("pane not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Which side of the base pane a split opens on. A hint for human visibility;
/// implementations may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSide {
    Horizontal,
    Vertical,
}

/// Abstract interface to a multiplexed terminal, the home an agent or a
/// user shell runs in. Role tagging is advisory (used for pane titles and
/// status-bar coloring); a no-op implementation may ignore it entirely.
#[async_trait]
pub trait PaneAdapter: Clone + Send + Sync + 'static {
    async fn open_pane(&self, initial_cwd: &Path, role_tag: &str, title: &str) -> Result<String, PaneError>;

    /// Append `text` to the pane; if `submit` is true, follow it with Enter
    /// so the agent's prompt actually fires.
    async fn send_text(&self, handle: &str, text: &str, submit: bool) -> Result<(), PaneError>;

    async fn split_pane(&self, base_handle: &str, side: SplitSide) -> Result<String, PaneError>;

    async fn close_pane(&self, handle: &str) -> Result<(), PaneError>;

    /// Whether the pane (and, transitively, the process inside it) is still alive.
    async fn is_alive(&self, handle: &str) -> Result<bool, PaneError>;
}
