// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Applying desired states to mod files.
//!
//! Every (pattern, state) pair is applied in order to every matching file.
//! A failed rename is recorded and skipped; the remaining files and patterns
//! are still processed.

use serde::Serialize;
use tracing::{debug, warn};

use super::pattern::PatternMatcher;
use super::{ModFile, ModState};

/// What a toggle pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedChanges {
    /// File names that were enabled, as named afterwards.
    pub enabled: Vec<String>,
    /// File names that were disabled, as named afterwards.
    pub disabled: Vec<String>,
    /// Matches that were already in the desired state.
    pub unchanged: usize,
    /// `(file name, reason)` for every rename that failed.
    pub failures: Vec<(String, String)>,
}

impl AppliedChanges {
    /// Number of files renamed.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.enabled.len() + self.disabled.len()
    }

    /// Fold another pass into this one.
    pub fn absorb(&mut self, other: Self) {
        self.enabled.extend(other.enabled);
        self.disabled.extend(other.disabled);
        self.unchanged += other.unchanged;
        self.failures.extend(other.failures);
    }
}

/// Bring every file matched by a pattern into that pattern's state.
///
/// `files` is updated in place, so later patterns see earlier renames.
pub fn apply(patterns: &[(PatternMatcher, ModState)], files: &mut [ModFile]) -> AppliedChanges {
    let mut changes = AppliedChanges::default();

    for (pattern, desired) in patterns {
        for file in files.iter_mut().filter(|f| pattern.matches(f.base_name())) {
            let before = file.file_name();
            match file.set_state(*desired) {
                Ok(false) => changes.unchanged += 1,
                Ok(true) => {
                    let after = file.file_name();
                    debug!(from = %before, to = %after, "mod toggled");
                    match desired {
                        ModState::Enabled => changes.enabled.push(after),
                        ModState::Disabled => changes.disabled.push(after),
                    }
                }
                Err(e) => {
                    warn!(file = %before, error = %e, "failed to toggle mod");
                    changes.failures.push((before, e.to_string()));
                }
            }
        }
    }

    changes
}
