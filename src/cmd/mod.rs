// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis), instance (snapshot, ignore), mods, sync
//! ```

pub mod config;
pub mod instance;
pub mod mods;
pub mod sync;
