// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod files and their enabled/disabled state.
//!
//! ```text
//! mods/
//!   sodium-0.6.jar            Enabled   base "sodium-0.6"
//!   iris-1.8.jar.disabled     Disabled  base "iris-1.8"
//!   README.md                 (not a mod, ignored)
//!
//! enable:  iris-1.8.jar.disabled --rename--> iris-1.8.jar
//! disable: sodium-0.6.jar        --rename--> sodium-0.6.jar.disabled
//! ```
//!
//! - [`pattern`]: wildcard matchers against base names
//! - [`toggle`]: apply desired states to a set of files
//! - [`optional`]: display-name to pattern lists and user selections

pub mod optional;
pub mod pattern;
pub mod toggle;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{FsError, SyncResult};

/// Suffix of an enabled mod file.
pub const ENABLED_SUFFIX: &str = ".jar";

/// Suffix added to an enabled file name to disable it.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Whether the game loads a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModState {
    Enabled,
    Disabled,
}

impl ModState {
    #[must_use]
    pub const fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

impl fmt::Display for ModState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// One mod file in the mods directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModFile {
    dir: PathBuf,
    base: String,
    state: ModState,
}

impl ModFile {
    /// Classify a file name. Returns `None` for anything that is not a mod.
    #[must_use]
    pub fn from_file_name(dir: &Path, file_name: &str) -> Option<Self> {
        let (base, state) = if let Some(stem) = file_name
            .strip_suffix(DISABLED_SUFFIX)
            .and_then(|rest| rest.strip_suffix(ENABLED_SUFFIX))
        {
            (stem, ModState::Disabled)
        } else if let Some(stem) = file_name.strip_suffix(ENABLED_SUFFIX) {
            (stem, ModState::Enabled)
        } else {
            return None;
        };
        if base.is_empty() {
            return None;
        }
        Some(Self {
            dir: dir.to_path_buf(),
            base: base.to_string(),
            state,
        })
    }

    /// Name without the enabled or disabled suffix.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub const fn state(&self) -> ModState {
        self.state
    }

    /// File name the mod would have in `state`.
    #[must_use]
    pub fn file_name_for(&self, state: ModState) -> String {
        match state {
            ModState::Enabled => format!("{}{ENABLED_SUFFIX}", self.base),
            ModState::Disabled => format!("{}{ENABLED_SUFFIX}{DISABLED_SUFFIX}", self.base),
        }
    }

    /// Current file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file_name_for(self.state)
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    /// Rename the file into `state`. Already in `state` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the rename fails, or if a file with the
    /// target name already exists.
    pub fn set_state(&mut self, state: ModState) -> SyncResult<bool> {
        if self.state == state {
            return Ok(false);
        }
        let from = self.path();
        let to = self.dir.join(self.file_name_for(state));
        if to.exists() {
            return Err(FsError::io(
                &to,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "target name is taken"),
            )
            .into());
        }
        std::fs::rename(&from, &to).map_err(|e| FsError::io(&from, e))?;
        self.state = state;
        Ok(true)
    }
}

/// List the mod files of `dir`, sorted by file name.
///
/// A missing directory holds no mods.
///
/// # Errors
///
/// Returns `FsError::IoError` if the directory exists but cannot be read.
pub fn list_mods(dir: &Path) -> SyncResult<Vec<ModFile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| FsError::io(dir, e))?;

    let mut mods = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FsError::io(dir, e))?;
        if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str()
            && let Some(file) = ModFile::from_file_name(dir, name)
        {
            mods.push(file);
        }
    }
    mods.sort_by_key(ModFile::file_name);
    Ok(mods)
}
