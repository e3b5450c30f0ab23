// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          sync / mods / snapshot
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |     sync (orchestrator)   |
//!              |  session, events, report  |
//!              '--+------+------+------+---'
//!                 |      |      |      |
//!                 v      v      v      v
//!               git   settings mods  snapshot
//!             gix/CLI  key:val  .jar  walk+diff
//!                 |
//!                net   lists, downloads
//!
//!   +-----------------------------------------+
//!   |  instance   root, layout, lock          |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config,   |
//!   |               utility                   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod instance;
pub mod logging;
pub mod mods;
pub mod net;
pub mod settings;
pub mod snapshot;
pub mod sync;
pub mod utility;
