// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Snapshot diffing with best-effort update pairing.
//!
//! ```text
//! before: mods/a-1.0.jar  mods/b.jar
//! after:  mods/a-2.0.jar  mods/b.jar  mods/c.jar
//!
//! naive:   added [a-2.0, c]   removed [a-1.0]
//! bases:   "mods/a-" -> removed [a-1.0], added [a-2.0]   => updated
//! result:  added [c]  removed []  updated [a-1.0 -> a-2.0]
//! ```
//!
//! The logical base is the parent directory plus the file name cut at its
//! first digit. Files sharing an early digit boundary can be mis-paired;
//! names starting with a digit never pair.

use std::collections::BTreeMap;

use serde::Serialize;

use super::FileSnapshot;

/// A removed file paired with the added file that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    pub from: String,
    pub to: String,
}

/// Differences between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<Update>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Logical base of a path, or `None` when the file name starts with a digit.
fn logical_base(path: &str) -> Option<&str> {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let cut = name.find(|c: char| c.is_ascii_digit()).unwrap_or(name.len());
    (cut > 0).then(|| &path[..name_start + cut])
}

fn is_relevant(path: &str, diff_paths: &[String]) -> bool {
    diff_paths.is_empty()
        || diff_paths.iter().any(|dir| {
            let dir = dir.trim_end_matches('/');
            path == dir
                || path
                    .strip_prefix(dir)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
}

/// Diff two snapshots, restricted to `diff_paths` (every path when empty).
///
/// `added` and `removed` are disjoint and sorted. Paired entries appear only
/// in `updated`.
#[must_use]
pub fn diff(before: &FileSnapshot, after: &FileSnapshot, diff_paths: &[String]) -> ChangeSet {
    let mut added: Vec<&str> = after
        .iter()
        .filter(|p| is_relevant(p, diff_paths) && !before.contains(p))
        .collect();
    let mut removed: Vec<&str> = before
        .iter()
        .filter(|p| is_relevant(p, diff_paths) && !after.contains(p))
        .collect();

    let mut removed_by_base: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for &path in &removed {
        if let Some(base) = logical_base(path) {
            removed_by_base.entry(base).or_default().push(path);
        }
    }
    let mut added_by_base: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for &path in &added {
        if let Some(base) = logical_base(path) {
            added_by_base.entry(base).or_default().push(path);
        }
    }

    let mut updated = Vec::new();
    for (base, olds) in &removed_by_base {
        let Some(news) = added_by_base.get(base) else {
            continue;
        };
        for (from, to) in olds.iter().zip(news.iter()) {
            updated.push(Update {
                from: (*from).to_string(),
                to: (*to).to_string(),
            });
        }
    }

    removed.retain(|p| !updated.iter().any(|u| u.from == *p));
    added.retain(|p| !updated.iter().any(|u| u.to == *p));
    updated.sort_by(|a, b| a.from.cmp(&b.from));

    ChangeSet {
        added: added.into_iter().map(String::from).collect(),
        removed: removed.into_iter().map(String::from).collect(),
        updated,
    }
}
