// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command implementation for packsync.
//!
//! ```text
//! lock instance --> SyncOrchestrator::run --> report (text | --json)
//!                         |
//!                    SyncEvent --> progress bar thread
//! ```

use std::sync::OnceLock;
use std::thread::JoinHandle;

use flume::Receiver;
use indicatif::{ProgressBar, ProgressStyle};

use super::instance::open_instance;
use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::backend::SystemGit;
use crate::sync::{EventSink, SyncEvent, SyncOrchestrator, SyncRequest, SyncState};

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-")
        })
        .clone()
}

/// Draw progress events until the sender side is dropped.
fn spawn_progress(events: Receiver<SyncEvent>, visible: bool) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let bar = if visible {
            let bar = ProgressBar::new(100);
            bar.set_style(bar_style());
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut failed = false;
        for event in events.iter() {
            match event {
                SyncEvent::Progress { percent, message } => {
                    bar.set_position(u64::from(percent));
                    bar.set_message(message);
                }
                SyncEvent::StateChanged(SyncState::Failed) => failed = true,
                SyncEvent::StateChanged(_) | SyncEvent::Info(_) | SyncEvent::Warning(_) => {}
            }
        }

        if failed {
            bar.abandon_with_message("sync failed");
        } else {
            bar.finish_and_clear();
        }
    })
}

/// Main handler for sync command.
///
/// # Errors
///
/// Returns an error if the instance is locked or cannot be opened, git is
/// missing, or the sync fails fatally.
pub async fn run_sync_command(args: &SyncArgs, config: &Config) -> Result<()> {
    let instance = open_instance(&args.instance, config)?;
    let _lock = instance.lock()?;
    let git = SystemGit::new()?;

    let request = SyncRequest::builder()
        .with_instance(instance.root())
        .maybe_with_profile(args.profile.clone())
        .with_sync_keybinds(args.sync_keybinds)
        .with_shaders(args.shaders.into())
        .with_mod_selections(args.mod_selections(&config.mods.toggles))
        .with_downloads(!args.no_downloads)
        .build();

    let (sink, events) = EventSink::channel();
    let progress = spawn_progress(events, !args.json);
    let result = SyncOrchestrator::new(config, &git)
        .with_events(sink)
        .run(&request)
        .await;
    let _ = progress.join();

    let report = result?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
