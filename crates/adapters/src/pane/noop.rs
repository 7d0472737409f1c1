// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pane adapter that does nothing, for minimal/headless deployments.

use super::{PaneAdapter, PaneError, SplitSide};
use async_trait::async_trait;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPaneAdapter;

impl NoOpPaneAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaneAdapter for NoOpPaneAdapter {
    async fn open_pane(&self, _initial_cwd: &Path, _role_tag: &str, _title: &str) -> Result<String, PaneError> {
        Ok("noop".to_string())
    }

    async fn send_text(&self, _handle: &str, _text: &str, _submit: bool) -> Result<(), PaneError> {
        Ok(())
    }

    async fn split_pane(&self, _base_handle: &str, _side: SplitSide) -> Result<String, PaneError> {
        Ok("noop".to_string())
    }

    async fn close_pane(&self, _handle: &str) -> Result<(), PaneError> {
        Ok(())
    }

    async fn is_alive(&self, _handle: &str) -> Result<bool, PaneError> {
        Ok(false)
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
