// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Newtype string identifiers and the generators that mint them.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shorten an id to its first 8 characters, for display and default branch names.
pub trait ShortId {
    fn short(&self) -> &str;
}

impl ShortId for str {
    fn short(&self) -> &str {
        let end = self.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.len());
        &self[..end]
    }
}

/// Defines a newtype wrapper around `String` with the usual id ergonomics:
/// `new`, `as_str`, `short`, `Display`, `From<String>`/`From<&str>`, and
/// `Borrow<str>` so it can key a `HashMap<_, _>` and be looked up by `&str`.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub(crate) String);

        impl $name {
            /// Construct from any string-like value.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters, used for default branch names and log lines.
            pub fn short(&self) -> &str {
                use $crate::id::ShortId;
                self.0.short()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a durable event.
    pub struct EventId;
}

define_id! {
    /// Unique identifier for a task (the unit of work a Planner submits).
    pub struct TaskId;
}

define_id! {
    /// Unique identifier for a worker (the process bound to one task).
    pub struct WorkerId;
}

/// Generates new ids. Production uses random uuids; tests use a deterministic
/// sequential counter so event orderings in assertions are reproducible.
pub trait IdGen: Send + Sync + 'static {
    fn next_id(&self, prefix: &str) -> String;
}

/// Production id generator: a random uuid (v4), prefixed for readability.
#[derive(Debug, Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4())
    }
}

/// Deterministic id generator for tests: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGen {
    counter: AtomicU64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}-{n}")
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
