// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fake pane adapter for tests: records calls and tracks liveness/content
//! in memory instead of shelling out to tmux.

use super::{PaneAdapter, PaneError, SplitSide};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum PaneCall {
    Open { cwd: PathBuf, role_tag: String, title: String },
    SendText { handle: String, text: String, submit: bool },
    Split { base_handle: String, side: SplitSide },
    Close { handle: String },
}

#[derive(Debug, Clone)]
pub struct FakePane {
    pub alive: bool,
    pub sent: Vec<String>,
}

struct Inner {
    panes: HashMap<String, FakePane>,
    calls: Vec<PaneCall>,
    next_id: u64,
}

#[derive(Clone)]
pub struct FakePaneAdapter {
    inner: Arc<Mutex<Inner>>,
}

impl Default for FakePaneAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                panes: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
            })),
        }
    }
}

impl FakePaneAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PaneCall> {
        self.inner.lock().calls.clone()
    }

    pub fn pane(&self, handle: &str) -> Option<FakePane> {
        self.inner.lock().panes.get(handle).cloned()
    }

    pub fn kill_externally(&self, handle: &str) {
        if let Some(pane) = self.inner.lock().panes.get_mut(handle) {
            pane.alive = false;
        }
    }
}

#[async_trait]
impl PaneAdapter for FakePaneAdapter {
    async fn open_pane(&self, cwd: &Path, role_tag: &str, title: &str) -> Result<String, PaneError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let handle = format!("fake-pane-{}", inner.next_id);
        inner.calls.push(PaneCall::Open {
            cwd: cwd.to_path_buf(),
            role_tag: role_tag.to_string(),
            title: title.to_string(),
        });
        inner.panes.insert(
            handle.clone(),
            FakePane {
                alive: true,
                sent: Vec::new(),
            },
        );
        Ok(handle)
    }

    async fn send_text(&self, handle: &str, text: &str, submit: bool) -> Result<(), PaneError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PaneCall::SendText {
            handle: handle.to_string(),
            text: text.to_string(),
            submit,
        });
        match inner.panes.get_mut(handle) {
            Some(pane) => {
                pane.sent.push(text.to_string());
                Ok(())
            }
            None => Err(PaneError::NotFound(handle.to_string())),
        }
    }

    async fn split_pane(&self, base_handle: &str, side: SplitSide) -> Result<String, PaneError> {
        let mut inner = self.inner.lock();
        if !inner.panes.contains_key(base_handle) {
            return Err(PaneError::NotFound(base_handle.to_string()));
        }
        inner.calls.push(PaneCall::Split {
            base_handle: base_handle.to_string(),
            side,
        });
        inner.next_id += 1;
        let handle = format!("fake-pane-{}", inner.next_id);
        inner.panes.insert(
            handle.clone(),
            FakePane {
                alive: true,
                sent: Vec::new(),
            },
        );
        Ok(handle)
    }

    async fn close_pane(&self, handle: &str) -> Result<(), PaneError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PaneCall::Close {
            handle: handle.to_string(),
        });
        inner.panes.remove(handle);
        Ok(())
    }

    async fn is_alive(&self, handle: &str) -> Result<bool, PaneError> {
        Ok(self.inner.lock().panes.get(handle).map(|p| p.alive).unwrap_or(false))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
