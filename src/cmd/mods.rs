// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mods command implementation for packsync.

use anyhow::bail;

use super::instance::open_instance;
use crate::cli::mods::{ModsArgs, ModsSubcommand};
use crate::config::Config;
use crate::error::Result;
use crate::mods::pattern::PatternMatcher;
use crate::mods::toggle::apply;
use crate::mods::{ModState, list_mods};

/// Main handler for mods command.
///
/// # Errors
///
/// Returns an error if the mods directory cannot be read, the pattern is
/// invalid, or any matching file failed to rename.
pub fn run_mods_command(args: &ModsArgs, config: &Config) -> Result<()> {
    let instance = open_instance(&args.instance, config)?;
    let mut files = list_mods(&instance.mods_dir())?;

    let (pattern, state) = match &args.subcommand {
        ModsSubcommand::List => {
            for file in &files {
                let marker = match file.state() {
                    ModState::Enabled => "on ",
                    ModState::Disabled => "off",
                };
                println!("{marker} {}", file.base_name());
            }
            return Ok(());
        }
        ModsSubcommand::Enable(p) => (&p.pattern, ModState::Enabled),
        ModsSubcommand::Disable(p) => (&p.pattern, ModState::Disabled),
    };

    let matcher = PatternMatcher::compile(pattern)?;
    let changes = apply(&[(matcher, state)], &mut files);

    for name in changes.enabled.iter().chain(&changes.disabled) {
        println!("{name}");
    }
    println!(
        "{} changed, {} already {}",
        changes.changed(),
        changes.unchanged,
        match state {
            ModState::Enabled => "enabled",
            ModState::Disabled => "disabled",
        }
    );

    if !changes.failures.is_empty() {
        for (name, reason) in &changes.failures {
            eprintln!("Failed to toggle {name}: {reason}");
        }
        bail!("{} mod(s) could not be toggled", changes.failures.len());
    }
    Ok(())
}
