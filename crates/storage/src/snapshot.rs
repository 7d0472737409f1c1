// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic checkpoint of `MaterializedState`, so a restart doesn't have to
//! replay the WAL from the beginning of time.
//!
//! Write order matters for crash safety: serialize + compress, write to a
//! `.tmp` path, fsync the tmp file, atomically rename over the live snapshot,
//! fsync the containing directory. Only once all of that has happened is it
//! safe for the caller to truncate the WAL prefix the snapshot now covers.

use crate::state::MaterializedState;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("compression error: {0}")]
    Compress(String),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    processed_seq: u64,
    state: MaterializedState,
}

pub struct Snapshot;

impl Snapshot {
    /// Write `state` to `path`, compressed with zstd, fsyncing the file and
    /// its parent directory before returning.
    pub fn write(path: impl AsRef<Path>, state: &MaterializedState) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let envelope = SnapshotEnvelope {
            version: CURRENT_SNAPSHOT_VERSION,
            processed_seq: state.processed_seq,
            state: state.clone(),
        };
        let json = serde_json::to_vec(&envelope)?;
        let compressed = zstd::encode_all(json.as_slice(), 0).map_err(|e| SnapshotError::Compress(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("snapshot.tmp");
        {
            let mut f = File::create(&tmp)?;
            f.write_all(&compressed)?;
            f.sync_all()?;
        }
        std::fs::rename(&tmp, path)?;
        if let Some(parent) = path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
        Ok(())
    }

    /// Read a previously written snapshot, if one exists.
    pub fn read(path: impl AsRef<Path>) -> Result<Option<MaterializedState>, SnapshotError> {
        let path = path.as_ref();
        let mut f = match OpenOptions::new().read(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut compressed = Vec::new();
        f.read_to_end(&mut compressed)?;
        let json = zstd::decode_all(compressed.as_slice()).map_err(|e| SnapshotError::Compress(e.to_string()))?;
        let envelope: SnapshotEnvelope = serde_json::from_slice(&json)?;
        Ok(Some(envelope.state))
    }
}

pub fn default_snapshot_path(state_dir: &Path) -> PathBuf {
    state_dir.join("store.snapshot")
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
