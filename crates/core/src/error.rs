// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The wire-level error shape returned to agents across the tool surface.
//!
//! Internal crates use their own `thiserror` enums; they are converted into
//! a `ToolError` only at the ToolSurface/daemon boundary, never leaked to
//! agents as an opaque string.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorCode {
    InvalidArgument,
    NotFound,
    Conflict,
    PreconditionFailed,
    Blocked,
    TransientIo,
    Fatal,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::NotFound, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidArgument, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::Conflict, message)
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::PreconditionFailed, message)
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::Blocked, message)
    }

    pub fn transient_io(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::TransientIo, message)
    }

    pub fn is_transient(&self) -> bool {
        self.code == ToolErrorCode::TransientIo
    }
}
