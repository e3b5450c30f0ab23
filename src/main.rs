// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Version | Options | Inis | Sync | Snapshot | Mods | Ignore
//!
//! A config that fails to load only fails the commands that need it.
//! ```

use std::process::ExitCode;

use packsync::cli::global::GlobalOptions;
use packsync::cli::{self, Command};
use packsync::cmd::config::{run_inis_command, run_options_command};
use packsync::cmd::instance::{run_ignore_command, run_snapshot_command};
use packsync::cmd::mods::run_mods_command;
use packsync::cmd::sync::run_sync_command;
use packsync::config::Config;
use packsync::config::loader::ConfigLoader;
use packsync::logging::init_logging;
use packsync::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Project-local config file picked up from the working directory.
const LOCAL_CONFIG: &str = "packsync.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let config = load_config(&cli.global);

    let log_config = match &config {
        Ok(config) => LogConfig::from_global(&config.global),
        Err(_) => build_log_config(&cli.global),
    };
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

/// Logging from the command line alone, for when the config is broken.
fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: packsync::error::Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Inis) => {
            run_inis_command(&config_layers(&cli.global).format_loaded_files());
            Ok(())
        }
        Some(Command::Sync(args)) => match config {
            Ok(config) => run_sync_command(args, &config).await,
            Err(e) => Err(e),
        },
        Some(Command::Snapshot(args)) => {
            config.and_then(|config| run_snapshot_command(args, &config))
        }
        Some(Command::Mods(args)) => config.and_then(|config| run_mods_command(args, &config)),
        Some(Command::Ignore(args)) => match config {
            Ok(config) => run_ignore_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// File layers only: `packsync.toml`, then every `--config` in order.
fn config_layers(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader
}

fn load_config(global: &GlobalOptions) -> packsync::error::Result<Config> {
    let mut loader = config_layers(global).with_env_prefix("PACKSYNC");
    for assignment in global.to_config_overrides() {
        loader = loader.set_assignment(&assignment)?;
    }
    loader
        .build()
        .map_err(|e| e.context("failed to load config"))
}
