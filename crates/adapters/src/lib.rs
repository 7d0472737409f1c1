// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aio-adapters: trait-based seams to everything outside the process —
//! the terminal multiplexer, the desktop notification center, and the
//! git/PR tooling that materializes a worker's workspace. Every trait has
//! a real implementation and a no-op/fake one so the engine can be
//! exercised deterministically in tests.

pub mod notify;
pub mod pane;
pub mod subprocess;
pub mod workspace;

pub use notify::NotifyAdapter;
pub use pane::PaneAdapter;
pub use workspace::WorkspaceBackend;

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use pane::FakePaneAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use workspace::FakeWorkspaceBackend;
