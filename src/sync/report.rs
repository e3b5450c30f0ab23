// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The result of a finished sync.

use std::fmt::Write as _;

use serde::Serialize;

use super::state::SyncState;
use crate::git::reset::ResetStrategy;
use crate::mods::toggle::AppliedChanges;
use crate::snapshot::diff::ChangeSet;

/// Structured outcome of one sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub state: SyncState,
    /// The reset strategy that succeeded.
    pub reset_via: ResetStrategy,
    pub changes: ChangeSet,
    pub mods: AppliedChanges,
    /// Artifacts downloaded this run.
    pub downloads: usize,
    pub warnings: Vec<String>,
}

impl SyncReport {
    /// Human-readable rendering.
    ///
    /// ```text
    /// reset via checkout origin/main
    /// changes: 1 added, 0 removed, 1 updated
    /// + mods/c.jar
    /// ~ mods/a-1.0.jar -> mods/a-2.0.jar
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "reset via {}", self.reset_via);

        let changes = &self.changes;
        let _ = writeln!(
            out,
            "changes: {} added, {} removed, {} updated",
            changes.added.len(),
            changes.removed.len(),
            changes.updated.len()
        );
        for path in &changes.added {
            let _ = writeln!(out, "+ {path}");
        }
        for path in &changes.removed {
            let _ = writeln!(out, "- {path}");
        }
        for update in &changes.updated {
            let _ = writeln!(out, "~ {} -> {}", update.from, update.to);
        }

        let _ = writeln!(
            out,
            "mods: {} enabled, {} disabled, {} unchanged",
            self.mods.enabled.len(),
            self.mods.disabled.len(),
            self.mods.unchanged
        );
        if self.downloads > 0 {
            let _ = writeln!(out, "downloads: {}", self.downloads);
        }
        for warning in &self.warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
        out
    }
}
