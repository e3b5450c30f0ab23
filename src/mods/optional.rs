// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Optional mods: display names mapped to patterns.
//!
//! ```text
//! Distant Horizons:DistantHorizons*
//! Shader Pack Loader:*iris*
//! ```
//!
//! User selections are keyed by display name, compared case-insensitively.

use std::collections::BTreeMap;

use super::ModState;
use super::pattern::PatternMatcher;

/// One `Display Name:pattern` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalMod {
    pub name: String,
    pub pattern: String,
}

/// A parsed optional-mod list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalMods {
    entries: Vec<OptionalMod>,
}

impl OptionalMods {
    /// Parse list lines. Lines without a `:` or with an empty side are
    /// returned as rejects.
    #[must_use]
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> (Self, Vec<String>) {
        let mut entries = Vec::new();
        let mut rejects = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            match line.split_once(':') {
                Some((name, pattern)) if !name.trim().is_empty() && !pattern.trim().is_empty() => {
                    entries.push(OptionalMod {
                        name: name.trim().to_string(),
                        pattern: pattern.trim().to_string(),
                    });
                }
                _ => rejects.push(line.to_string()),
            }
        }
        (Self { entries }, rejects)
    }

    #[must_use]
    pub fn entries(&self) -> &[OptionalMod] {
        &self.entries
    }

    /// Look up a display name, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&OptionalMod> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Patterns resolved from user selections.
#[derive(Debug, Default)]
pub struct Resolved {
    pub patterns: Vec<(PatternMatcher, ModState)>,
    pub warnings: Vec<String>,
}

/// Turn `display name -> enabled` selections into patterns.
///
/// With a list, unknown names become warnings. Without one, each selection
/// key is used as a raw pattern.
#[must_use]
pub fn resolve(list: Option<&OptionalMods>, selections: &BTreeMap<String, bool>) -> Resolved {
    let mut resolved = Resolved::default();

    for (name, enabled) in selections {
        let pattern = match list {
            Some(list) => match list.find(name) {
                Some(entry) => entry.pattern.as_str(),
                None => {
                    resolved
                        .warnings
                        .push(format!("unknown optional mod '{name}'"));
                    continue;
                }
            },
            None => name.as_str(),
        };

        match PatternMatcher::compile(pattern) {
            Ok(matcher) => resolved
                .patterns
                .push((matcher, ModState::from_enabled(*enabled))),
            Err(e) => resolved
                .warnings
                .push(format!("invalid pattern for '{name}': {e}")),
        }
    }

    resolved
}
