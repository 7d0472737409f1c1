// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deny-list command matcher applied to every `execute_command` call.
//!
//! A match vetoes the command outright: no subprocess is ever started.
//! Patterns are case-insensitive regexes compiled once at construction.

use regex::Regex;

pub struct SafetyGuard {
    patterns: Vec<(&'static str, Regex)>,
}

impl SafetyGuard {
    pub fn new() -> Self {
        let raw: &[(&str, &str)] = &[
            ("recursive deletion of root/home", r"rm\s+.*-[a-zA-Z]*r[a-zA-Z]*f.*\s+(?:/|~|\$HOME|\.\.)(?:$|[\s/*])"),
            ("raw device write", r">\s*/dev/(sd|nvme|disk|hd)[a-z0-9]*\b"),
            ("filesystem format", r"\bmkfs(\.\w+)?\b"),
            ("dd to a device", r"\bdd\b.*\bof=/dev/"),
            ("force push", r"\bgit\s+push\b.*(--force\b|-f\b)"),
            ("hard reset", r"\bgit\s+reset\b.*--hard\b"),
            ("aggressive clean", r"\bgit\s+clean\b.*-[a-zA-Z]*[dfx][a-zA-Z]*[dfx]"),
            ("credential file access", r"\b(cat|cp|mv|curl|nc)\b.*\.(env|netrc|aws/credentials|ssh/id_\w+)\b"),
            ("remote fetch piped into a shell", r"\bcurl\b.*\|\s*(sh|bash|zsh)\b"),
            ("mentions production", r"production"),
        ];
        let patterns = raw
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(&format!("(?i){pattern}")).expect("safety guard pattern must compile"),
                )
            })
            .collect();
        Self { patterns }
    }

    /// Returns the name of the first matching deny pattern, if any.
    pub fn check(&self, command: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(command))
            .map(|(name, _)| *name)
    }

    pub fn is_blocked(&self, command: &str) -> bool {
        self.check(command).is_some()
    }
}

impl Default for SafetyGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "safety_guard_tests.rs"]
mod tests;
