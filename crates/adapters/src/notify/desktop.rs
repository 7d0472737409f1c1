// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification adapter using notify-rust.
//!
//! On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to
//! send notifications via the Notification Center. The first notification
//! triggers an AppleScript bundle-identifier lookup that blocks forever in a
//! daemon lacking Automation permissions, so the bundle id is pre-set at
//! construction time to skip it.

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let message = message.to_string();
        // notify_rust's show() is synchronous; run it on the blocking pool so
        // a slow notification daemon can't stall the orchestrator loop.
        tokio::task::spawn_blocking(move || match notify_rust::Notification::new()
            .summary(&title)
            .body(&message)
            .show()
        {
            Ok(_) => tracing::info!(%title, "desktop notification sent"),
            Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
        });
        Ok(())
    }
}
