// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command arguments.
//!
//! ```text
//! sync ~/.minecraft --profile potato --shaders dont-sync
//!      --enable "Distant Horizons" --disable "*Replay*"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::sync::ShaderPreset;

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Instance root directory.
    #[arg(value_name = "INSTANCE")]
    pub instance: PathBuf,

    /// Settings profile merged after the reset.
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Take keybinds from the modpack instead of keeping your own.
    #[arg(long = "sync-keybinds")]
    pub sync_keybinds: bool,

    /// Shader settings preset.
    #[arg(long, value_enum, default_value_t = ShaderArg::Default)]
    pub shaders: ShaderArg,

    /// Enable an optional mod (display name or pattern). Can repeat.
    #[arg(long, value_name = "NAME", action = clap::ArgAction::Append)]
    pub enable: Vec<String>,

    /// Disable an optional mod (display name or pattern). Can repeat.
    #[arg(long, value_name = "NAME", action = clap::ArgAction::Append)]
    pub disable: Vec<String>,

    /// Skip downloading large mod files.
    #[arg(long = "no-downloads")]
    pub no_downloads: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// `base` selections overlaid with `--enable` then `--disable`.
    ///
    /// Names compare without case, as optional mods are looked up; a flag
    /// replaces any differently cased entry for the same mod.
    #[must_use]
    pub fn mod_selections(&self, base: &BTreeMap<String, bool>) -> BTreeMap<String, bool> {
        let mut selections = base.clone();
        for name in &self.enable {
            select(&mut selections, name, true);
        }
        for name in &self.disable {
            select(&mut selections, name, false);
        }
        selections
    }
}

fn select(selections: &mut BTreeMap<String, bool>, name: &str, enabled: bool) {
    selections.retain(|key, _| !key.trim().eq_ignore_ascii_case(name.trim()));
    selections.insert(name.to_string(), enabled);
}

/// Shader preset names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShaderArg {
    Off,
    Alternate,
    Default,
    DontSync,
}

impl From<ShaderArg> for ShaderPreset {
    fn from(arg: ShaderArg) -> Self {
        match arg {
            ShaderArg::Off => Self::Off,
            ShaderArg::Alternate => Self::Alternate,
            ShaderArg::Default => Self::Default,
            ShaderArg::DontSync => Self::DontSync,
        }
    }
}
