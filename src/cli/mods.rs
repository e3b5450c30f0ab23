// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mods command arguments.
//!
//! # Subcommands
//!
//! ```text
//! mods INSTANCE list
//!   → every mod with its state
//! mods INSTANCE enable PATTERN
//!   → rename matching *.jar.disabled to *.jar
//! mods INSTANCE disable PATTERN
//!   → rename matching *.jar to *.jar.disabled
//! ```

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the `mods` command.
#[derive(Debug, Clone, Args)]
pub struct ModsArgs {
    /// Instance root directory.
    #[arg(value_name = "INSTANCE")]
    pub instance: PathBuf,

    /// Mods subcommand.
    #[command(subcommand)]
    pub subcommand: ModsSubcommand,
}

/// Mods subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ModsSubcommand {
    /// Lists every mod file and whether it is enabled.
    List,

    /// Enables the mods matching a wildcard pattern.
    Enable(PatternArgs),

    /// Disables the mods matching a wildcard pattern.
    Disable(PatternArgs),
}

/// A wildcard pattern such as `sodium*` or `*shader*`.
#[derive(Debug, Clone, Args)]
pub struct PatternArgs {
    #[arg(value_name = "PATTERN")]
    pub pattern: String,
}
