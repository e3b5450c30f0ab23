// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile merging.
//!
//! ```text
//! <profile dir>/
//!   potato.txt        --merge-->  options.txt
//!   iris.properties   --copy--->  config/iris.properties
//!   sodium.json       --copy--->  config/sodium.json
//! ```
//!
//! Override values win, except keybinds while they are being preserved.

use std::path::Path;

use tracing::{debug, info};

use super::SettingsDocument;
use crate::error::SyncResult;
use crate::utility::fs::copy::copy_files_except_async;

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing keys whose value was replaced.
    pub overridden: usize,
    /// Keys added because the target lacked them.
    pub appended: usize,
    /// Keybind keys left alone.
    pub preserved: usize,
}

/// Merges override profiles into instance settings.
#[derive(Debug, Clone)]
pub struct ProfileMerge {
    keybind_prefix: String,
    preserve_keybinds: bool,
}

impl ProfileMerge {
    #[must_use]
    pub fn new(keybind_prefix: impl Into<String>, preserve_keybinds: bool) -> Self {
        Self {
            keybind_prefix: keybind_prefix.into(),
            preserve_keybinds,
        }
    }

    fn is_protected(&self, key: &str) -> bool {
        self.preserve_keybinds && key.starts_with(&self.keybind_prefix)
    }

    /// Merge `overrides` into `target`.
    ///
    /// For each override key: protected keybinds keep the target's value
    /// (and are not appended when missing); every other key takes the
    /// override value, in place or appended.
    #[must_use]
    pub fn merge(
        &self,
        target: &SettingsDocument,
        overrides: &SettingsDocument,
    ) -> (SettingsDocument, MergeOutcome) {
        let mut merged = target.clone();
        let mut outcome = MergeOutcome::default();

        for (key, value) in overrides.pairs().filter(|(k, _)| !k.is_empty()) {
            if self.is_protected(key) {
                outcome.preserved += 1;
                continue;
            }
            if merged.contains_key(key) {
                outcome.overridden += 1;
            } else {
                outcome.appended += 1;
            }
            merged.set(key, value);
        }

        (merged, outcome)
    }

    /// Merge a profile directory into an instance.
    ///
    /// Reads `<profile_dir>/<profile_settings>`, merges it into
    /// `settings_path` (a missing target starts empty), then copies every
    /// other top-level file of the profile directory into `config_dir`,
    /// overwriting. Returns the merge outcome and the copied file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings files cannot be read or written or
    /// an auxiliary file cannot be copied.
    pub async fn apply_dir(
        &self,
        profile_dir: &Path,
        profile_settings: &str,
        settings_path: &Path,
        config_dir: &Path,
    ) -> SyncResult<(MergeOutcome, Vec<String>)> {
        let overrides = SettingsDocument::load(&profile_dir.join(profile_settings))?;
        let target = SettingsDocument::load_optional(settings_path)?.unwrap_or_default();

        let (merged, outcome) = self.merge(&target, &overrides);
        merged.save(settings_path)?;
        info!(
            overridden = outcome.overridden,
            appended = outcome.appended,
            preserved = outcome.preserved,
            "profile settings merged"
        );

        let copied = copy_files_except_async(profile_dir, config_dir, &[profile_settings]).await?;
        for name in &copied {
            debug!(file = %name, "applied profile config");
        }

        Ok((outcome, copied))
    }
}
