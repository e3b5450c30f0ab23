// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Progress and log events emitted while a sync runs.
//!
//! ```text
//! SyncOrchestrator --EventSink--> flume channel --> front end
//! ```
//!
//! The sink is optional; a dropped receiver is ignored.

use flume::{Receiver, Sender};

use super::state::SyncState;

/// One observable step of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    StateChanged(SyncState),
    Progress { percent: u8, message: String },
    Info(String),
    Warning(String),
}

/// Sending half of an event stream.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<Sender<SyncEvent>>,
}

impl EventSink {
    /// A sink that drops every event.
    #[must_use]
    pub const fn none() -> Self {
        Self { sender: None }
    }

    #[must_use]
    pub const fn new(sender: Sender<SyncEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// An unbounded channel and the sink feeding it.
    #[must_use]
    pub fn channel() -> (Self, Receiver<SyncEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: SyncEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    pub fn progress(&self, percent: u8, message: impl Into<String>) {
        self.emit(SyncEvent::Progress {
            percent: percent.min(100),
            message: message.into(),
        });
    }
}
