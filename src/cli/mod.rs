// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for packsync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! packsync [global options] <command>
//! version
//! options
//! inis
//! sync <INSTANCE> [--profile NAME] [--shaders PRESET] [--enable NAME]...
//! snapshot <INSTANCE>
//! mods <INSTANCE> {list|enable PATTERN|disable PATTERN}
//! ignore <INSTANCE>
//! ```

pub mod global;
pub mod mods;
pub mod sync;


use std::path::PathBuf;

use crate::cli::global::GlobalOptions;
use crate::cli::mods::ModsArgs;
use crate::cli::sync::SyncArgs;
use clap::{Args, Parser, Subcommand};

/// Modpack instance synchronizer
///
/// Keeps a game instance in sync with a git-hosted modpack.
#[derive(Debug, Parser)]
#[command(
    name = "packsync",
    author,
    version,
    about = "Modpack instance synchronizer",
    long_about = "packsync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Resets the tracked folders of a game instance to the modpack\n\
                  repository while keeping keybinds, disabled mods and other\n\
                  local choices. See `packsync <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  packsync reads `packsync.toml` from the current directory if it\n\
                  exists. Additional files can be given with --config; later files\n\
                  override earlier ones. PACKSYNC_<SECTION>__<KEY> environment\n\
                  variables (e.g. PACKSYNC_REMOTE__URL) and --set KEY=VALUE are\n\
                  applied last."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files that were loaded.
    Inis,

    /// Synchronizes an instance with the modpack repository.
    Sync(SyncArgs),

    /// Prints the tracked files of an instance.
    Snapshot(InstanceArgs),

    /// Lists or toggles mods.
    Mods(ModsArgs),

    /// Regenerates the instance's ignore file.
    Ignore(InstanceArgs),
}

/// A command that only needs the instance directory.
#[derive(Debug, Clone, Args)]
pub struct InstanceArgs {
    /// Instance root directory.
    #[arg(value_name = "INSTANCE")]
    pub instance: PathBuf,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
