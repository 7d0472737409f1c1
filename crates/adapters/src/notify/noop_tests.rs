// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn notify_always_succeeds() {
    let adapter = NoOpNotifyAdapter::new();
    adapter.notify("title", "message").await.unwrap();
}
