// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tracked-file listings and before/after change detection.
//!
//! ```text
//!   instance root
//!        |  tracked paths: config/ mods/ options.txt ...
//!        v
//!   FileSnapshot::take() ---> ["config/a.json", "mods/x-1.0.jar", ...]
//!                                   (sorted, '/' separators,
//!                                    excluded file names dropped)
//!
//!   diff(before, after, diff_paths) ---> ChangeSet { added, removed, updated }
//! ```

pub mod diff;

#[cfg(test)]
mod tests;

pub use diff::{ChangeSet, Update, diff};

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::SyncResult;
use crate::utility::fs::walk::{WalkOptions, parallel_walk};

/// Relative file paths under the tracked paths at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSnapshot {
    entries: BTreeSet<String>,
}

impl FileSnapshot {
    /// Enumerate every file under `tracked`, relative to `root`.
    ///
    /// Tracked paths that do not exist contribute nothing. Files whose name
    /// is in `excluded` are dropped wherever they live.
    ///
    /// # Errors
    ///
    /// Returns an error if a tracked directory cannot be walked.
    pub fn take<S, T>(root: &Path, tracked: &[S], excluded: &[T]) -> SyncResult<Self>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let excluded: Vec<&str> = excluded.iter().map(AsRef::as_ref).collect();
        let options = WalkOptions::for_instance();
        let mut entries = BTreeSet::new();

        for rel in tracked {
            let path = root.join(rel.as_ref());
            if path.is_file() {
                entries.insert(normalize(rel.as_ref()));
            } else if path.is_dir() {
                for file in parallel_walk(&path, &options)?.into_files() {
                    if let Ok(rel) = file.strip_prefix(root) {
                        entries.insert(normalize(&rel.to_string_lossy()));
                    }
                }
            }
        }

        entries.retain(|entry| {
            let name = entry.rsplit('/').next().unwrap_or(entry);
            !excluded.contains(&name)
        });

        debug!(root = %root.display(), files = entries.len(), "snapshot taken");
        Ok(Self { entries })
    }

    /// Build a snapshot from relative paths.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: paths.into_iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}
