// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-mostly instance commands: `snapshot` and `ignore`.

use std::path::Path;

use anyhow::Context;

use crate::cli::InstanceArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::ignore::IGNORE_FILE;
use crate::instance::Instance;
use crate::snapshot::FileSnapshot;
use crate::sync::{EventSink, Session, write_ignore_file};

/// Open the instance named on the command line.
///
/// # Errors
///
/// Returns an error if the path is not a directory.
pub fn open_instance(path: &Path, config: &Config) -> Result<Instance> {
    Instance::open(path, config.instance.clone())
        .with_context(|| format!("cannot open instance {}", path.display()))
}

/// Print every tracked file, one relative path per line.
///
/// # Errors
///
/// Returns an error if the instance cannot be opened or walked.
pub fn run_snapshot_command(args: &InstanceArgs, config: &Config) -> Result<()> {
    let instance = open_instance(&args.instance, config)?;
    let snapshot = FileSnapshot::take(
        instance.root(),
        instance.tracked_paths(),
        &config.snapshot.excluded_files,
    )?;

    for path in snapshot.iter() {
        println!("{path}");
    }
    Ok(())
}

/// Regenerate the ignore file without syncing.
///
/// # Errors
///
/// Returns an error if the instance cannot be opened or the file cannot be
/// written.
pub async fn run_ignore_command(args: &InstanceArgs, config: &Config) -> Result<()> {
    let instance = open_instance(&args.instance, config)?;
    let mut session = Session::new(EventSink::none());

    write_ignore_file(config, &instance, &mut session).await?;
    for warning in session.warnings() {
        eprintln!("warning: {warning}");
    }
    println!("Wrote {}", instance.join(IGNORE_FILE).display());
    Ok(())
}
