// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log backing the durable event store.
//!
//! The log is a sequence of newline-delimited JSON records. Two kinds of
//! record are written: a new `Event` (assigned the next dense `seq`), and a
//! `MarkProcessed(seq)` marker recording that the orchestrator loop finished
//! handling that event. Replaying the file in order reconstructs both the
//! full event history and the `processed` flag on each one.
//!
//! Durability is group-committed: appends buffer in memory and are flushed
//! (written + fsynced) when either `FLUSH_THRESHOLD` records have
//! accumulated or `FLUSH_INTERVAL` has elapsed since the last flush,
//! whichever comes first. `next_unprocessed` always flushes before reading,
//! so callers never observe a write they haven't yet durably committed.

use aio_core::{Event, EventId, EventPayload, TaskId};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const FLUSH_INTERVAL: Duration = Duration::from_millis(10);
pub const FLUSH_THRESHOLD: usize = 100;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt record at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
enum WalRecord {
    Append { event: Event },
    MarkProcessed { seq: u64 },
}

pub struct Wal {
    path: PathBuf,
    file: File,
    write_seq: AtomicU64,
    processed_seq: AtomicU64,
    unflushed: usize,
    last_flush: Instant,
}

impl Wal {
    /// Open (creating if absent) the log at `path`, replaying any existing
    /// records. A corrupt trailing line (a crash mid-write) is tolerated: the
    /// valid prefix is kept and the original file is rotated to `<path>.bak`
    /// rather than silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, Vec<Event>), WalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (events, valid_len) = scan_wal(&path)?;

        if let Ok(meta) = std::fs::metadata(&path) {
            if meta.len() > valid_len {
                let bak = rotate_bak_path(&path);
                std::fs::copy(&path, &bak)?;
                let f = OpenOptions::new().write(true).open(&path)?;
                f.set_len(valid_len)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)?;

        let write_seq = events.last().map(|e| e.seq).unwrap_or(0);
        let processed_seq = events
            .iter()
            .take_while(|e| e.processed)
            .last()
            .map(|e| e.seq)
            .unwrap_or(0);

        let wal = Wal {
            path,
            file,
            write_seq: AtomicU64::new(write_seq),
            processed_seq: AtomicU64::new(processed_seq),
            unflushed: 0,
            last_flush: Instant::now(),
        };
        Ok((wal, events))
    }

    /// Append a new event, assigning it the next dense sequence number.
    /// Buffers the write; call `flush` (or let a threshold trip) to make it
    /// durable.
    pub fn append(&mut self, task_id: TaskId, payload: EventPayload, now_ms: i64) -> Result<Event, WalError> {
        let seq = self.write_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let event = Event {
            id: EventId::new(format!("evt-{seq}")),
            seq,
            created_at_ms: now_ms,
            task_id,
            payload,
            processed: false,
        };
        self.write_record(&WalRecord::Append {
            event: event.clone(),
        })?;
        Ok(event)
    }

    /// Record that `seq` has been handled by the orchestrator loop.
    /// `processed` flips false -> true exactly once; never backward.
    pub fn mark_processed(&mut self, seq: u64) -> Result<(), WalError> {
        if seq <= self.processed_seq.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.write_record(&WalRecord::MarkProcessed { seq })?;
        self.processed_seq.store(seq, Ordering::SeqCst);
        Ok(())
    }

    fn write_record(&mut self, record: &WalRecord) -> Result<(), WalError> {
        let line = serde_json::to_string(record).map_err(|e| WalError::Corrupt { line: 0, source: e })?;
        writeln!(self.file, "{line}")?;
        self.unflushed += 1;
        if self.needs_flush() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD || self.last_flush.elapsed() >= FLUSH_INTERVAL
    }

    /// The durability point: fsync the file so every buffered write survives
    /// a crash from here on.
    pub fn flush(&mut self) -> Result<(), WalError> {
        if self.unflushed == 0 {
            return Ok(());
        }
        self.file.flush()?;
        self.file.sync_all()?;
        self.unflushed = 0;
        self.last_flush = Instant::now();
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq.load(Ordering::SeqCst)
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq.load(Ordering::SeqCst)
    }

    /// Truncate the log before `seq`, dropping fully-processed history after
    /// a snapshot has durably captured it. Atomic via write-to-tmp + rename.
    pub fn truncate_before(&mut self, seq: u64, remaining: &[Event]) -> Result<(), WalError> {
        self.flush()?;
        let tmp = self.path.with_extension("wal.tmp");
        {
            let mut f = File::create(&tmp)?;
            for event in remaining.iter().filter(|e| e.seq >= seq) {
                let line = serde_json::to_string(&WalRecord::Append { event: event.clone() })
                    .map_err(|e| WalError::Corrupt { line: 0, source: e })?;
                writeln!(f, "{line}")?;
            }
            f.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Scan the log from scratch, replaying `Append`/`MarkProcessed` records into
/// an ordered event list. Returns the events plus the byte length of the
/// valid (parseable) prefix.
fn scan_wal(path: &Path) -> Result<(Vec<Event>, u64), WalError> {
    let Ok(file) = File::open(path) else {
        return Ok((Vec::new(), 0));
    };
    let mut reader = BufReader::new(file);
    let mut events: Vec<Event> = Vec::new();
    let mut valid_len: u64 = 0;
    let mut line = String::new();
    loop {
        line.clear();
        let start = reader.stream_position()?;
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<WalRecord>(trimmed) {
            Ok(WalRecord::Append { event }) => {
                events.push(event);
                valid_len = start + read as u64;
            }
            Ok(WalRecord::MarkProcessed { seq }) => {
                if let Some(e) = events.iter_mut().find(|e| e.seq == seq) {
                    e.processed = true;
                }
                valid_len = start + read as u64;
            }
            Err(_) => {
                // Tolerate a truncated trailing line (crash mid-write);
                // anything earlier than here is durable and kept.
                break;
            }
        }
    }
    Ok((events, valid_len))
}

pub fn rotate_bak_path(path: &Path) -> PathBuf {
    let mut bak = path.as_os_str().to_owned();
    bak.push(".bak");
    PathBuf::from(bak)
}

/// Read the full on-disk contents back out, for diagnostics/tests.
pub fn read_raw(path: &Path) -> io::Result<String> {
    let mut s = String::new();
    File::open(path)?.read_to_string(&mut s)?;
    Ok(s)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
