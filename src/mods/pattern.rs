// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiled wildcard patterns.
//!
//! ```text
//! "sodium"        -> Exact("sodium")
//! "sodium*"       -> Prefix("sodium")
//! "*shader*core*" -> Wildcard(^.*shader.*core.*$)
//! ```
//!
//! `*` matches any run of characters, including none. Every comparison is
//! case-insensitive. A candidate matches when its base name, or the base name
//! with `.jar` or `.jar.disabled` appended, matches.

use regex::{Regex, RegexBuilder};

use super::{DISABLED_SUFFIX, ENABLED_SUFFIX};
use crate::error::{ConfigError, SyncResult};

/// A wildcard pattern compiled once and matched many times.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    /// No `*`: the whole candidate must equal the name.
    Exact(String),
    /// A single trailing `*`.
    Prefix(String),
    /// Anything else, as an anchored case-insensitive regex.
    Wildcard(Regex),
}

impl PatternMatcher {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the pattern is empty or the
    /// generated regex cannot be built.
    pub fn compile(pattern: &str) -> SyncResult<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(invalid(pattern, "pattern is empty"));
        }

        let stars = pattern.matches('*').count();
        if stars == 0 {
            return Ok(Self::Exact(pattern.to_lowercase()));
        }
        if stars == 1 && pattern.ends_with('*') && pattern.len() > 1 {
            return Ok(Self::Prefix(
                pattern.trim_end_matches('*').to_lowercase(),
            ));
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^{body}$"))
            .case_insensitive(true)
            .build()
            .map_err(|e| invalid(pattern, &e.to_string()))?;
        Ok(Self::Wildcard(regex))
    }

    /// Compile a bulk-disable list entry: plain names match anywhere.
    ///
    /// # Errors
    ///
    /// Same as [`PatternMatcher::compile`].
    pub fn substring(entry: &str) -> SyncResult<Self> {
        let entry = entry.trim();
        if entry.contains('*') {
            Self::compile(entry)
        } else {
            Self::compile(&format!("*{entry}*"))
        }
    }

    fn matches_one(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(name) => candidate.to_lowercase() == *name,
            Self::Prefix(prefix) => candidate.to_lowercase().starts_with(prefix.as_str()),
            Self::Wildcard(regex) => regex.is_match(candidate),
        }
    }

    /// Whether a mod with this base name matches.
    #[must_use]
    pub fn matches(&self, base_name: &str) -> bool {
        self.matches_one(base_name)
            || self.matches_one(&format!("{base_name}{ENABLED_SUFFIX}"))
            || self.matches_one(&format!("{base_name}{ENABLED_SUFFIX}{DISABLED_SUFFIX}"))
    }
}

fn invalid(pattern: &str, message: &str) -> crate::error::SyncError {
    ConfigError::InvalidValue {
        section: "mods".to_string(),
        key: pattern.to_string(),
        message: message.to_string(),
    }
    .into()
}
