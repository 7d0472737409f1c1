// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aio-storage: the durable write-ahead log, periodic snapshots, the
//! in-memory materialized state they rebuild, and the `Store` that
//! serializes access to all three.

pub mod snapshot;
pub mod state;
pub mod store;
pub mod wal;

pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use store::{Store, StoreError};
pub use wal::{Wal, WalError};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    pub use crate::wal::{read_raw, rotate_bak_path};
}
