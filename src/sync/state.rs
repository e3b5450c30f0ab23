// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync state machine and per-invocation session.
//!
//! ```text
//! Idle -> RepositoryReady -> Reset -> Restored -> ProfileApplied
//!      -> ModsToggled -> Reported -> Done
//!
//! any non-terminal state -> Failed
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use super::events::{EventSink, SyncEvent};
use crate::error::{SyncResult, bail_out};
use crate::settings::keybinds::KeyBackup;

/// Where a sync currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    RepositoryReady,
    Reset,
    Restored,
    ProfileApplied,
    ModsToggled,
    Reported,
    Done,
    Failed,
}

impl SyncState {
    /// The state following `self` on success, `None` for terminal states.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::RepositoryReady),
            Self::RepositoryReady => Some(Self::Reset),
            Self::Reset => Some(Self::Restored),
            Self::Restored => Some(Self::ProfileApplied),
            Self::ProfileApplied => Some(Self::ModsToggled),
            Self::ModsToggled => Some(Self::Reported),
            Self::Reported => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a valid transition.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        if next == Self::Failed {
            return !self.is_terminal();
        }
        self.successor() == Some(next)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RepositoryReady => "repository_ready",
            Self::Reset => "reset",
            Self::Restored => "restored",
            Self::ProfileApplied => "profile_applied",
            Self::ModsToggled => "mods_toggled",
            Self::Reported => "reported",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything scoped to one sync invocation.
///
/// Created by `SyncOrchestrator::run` and dropped when it returns.
#[derive(Debug)]
pub struct Session {
    state: SyncState,
    events: EventSink,
    warnings: Vec<String>,
    pub(super) key_backup: KeyBackup,
    /// Contents of the shader target before the reset, for `DontSync`.
    pub(super) shader_backup: Option<Vec<u8>>,
    /// Download list, `None` when it could not be fetched.
    pub(super) download_urls: Option<Vec<String>>,
}

impl Session {
    #[must_use]
    pub const fn new(events: EventSink) -> Self {
        Self {
            state: SyncState::Idle,
            events,
            warnings: Vec::new(),
            key_backup: KeyBackup::new(),
            shader_backup: None,
            download_urls: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(super) fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Bailed` for a transition the state machine does
    /// not allow.
    pub fn advance(&mut self, next: SyncState) -> SyncResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(bail_out(format!(
                "invalid sync transition {} -> {next}",
                self.state
            )));
        }
        info!(from = %self.state, to = %next, "sync state");
        self.state = next;
        self.events.emit(SyncEvent::StateChanged(next));
        Ok(())
    }

    /// Enter `Failed` unless already terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = SyncState::Failed;
            self.events.emit(SyncEvent::StateChanged(SyncState::Failed));
        }
    }

    /// Record a recoverable problem.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.events.emit(SyncEvent::Warning(message.clone()));
        self.warnings.push(message);
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.events.emit(SyncEvent::Info(message));
    }

    pub fn progress(&self, percent: u8, message: impl Into<String>) {
        self.events.progress(percent, message);
    }
}
