// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Internal error type for the orchestrator loop, notifier, and reaper.
//! Never surfaced to agents directly; the tool surface maps its own
//! failures straight to `ToolError` instead of routing through this type.

use crate::executor::ExecuteError;
use aio_adapters::notify::NotifyError;
use aio_adapters::pane::PaneError;
use aio_adapters::workspace::WorkspaceError;
use aio_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("pane error: {0}")]
    Pane(#[from] PaneError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}
