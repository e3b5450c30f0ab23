// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for packsync.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, RemoteConfig, InstanceConfig, SettingsConfig,
//!         ListsConfig, ShadersConfig, SnapshotConfig, ModsConfig
//! Profiles: profile name -> ProfileConfig
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::logging::LogLevel;
use crate::net::ListSource;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// The version-controlled remote the instance follows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Clone URL of the modpack repository.
    pub url: String,
    /// Name of the remote inside the instance's working copy.
    pub name: String,
    /// Branches tried in order when resetting.
    pub branches: Vec<String>,
    /// Local branch created by the remote-head fallback.
    pub temp_branch: String,
    /// Fetch with `--depth 1`.
    pub shallow: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "https://github.com/gisketch/ckdm-mods.git".to_string(),
            name: "origin".to_string(),
            branches: vec!["main".to_string(), "master".to_string()],
            temp_branch: "temp-sync".to_string(),
            shallow: true,
        }
    }
}

/// Layout of an instance directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstanceConfig {
    /// Relative paths that form the sync boundary.
    pub tracked_paths: Vec<String>,
    /// Directory holding toggleable mod files.
    pub mods_dir: String,
    /// The `key:value` settings file.
    pub settings_file: String,
    /// Directory auxiliary profile files are copied into.
    pub config_dir: String,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            tracked_paths: [
                "config",
                "resourcepacks",
                "shaderpacks",
                "mods",
                "potato",
                "options.txt",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            mods_dir: "mods".to_string(),
            settings_file: "options.txt".to_string(),
            config_dir: "config".to_string(),
        }
    }
}

/// Which settings survive a reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Keys starting with this prefix are keybinds.
    pub keybind_prefix: String,
    /// Extra exact keys preserved like keybinds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preserve_keys: Vec<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            keybind_prefix: "key_".to_string(),
            preserve_keys: Vec::new(),
        }
    }
}

/// Remote text lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListsConfig {
    /// URLs of large artifacts that are downloaded instead of versioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<ListSource>,
    /// `Display Name:pattern` pairs for optional mods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_mods: Option<ListSource>,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            downloads: Some(ListSource::from("https://pastebin.com/raw/0BZqtTNN")),
            optional_mods: None,
        }
    }
}

/// A named bundle of override settings and config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Profile source directory, relative to the instance root.
    pub dir: String,
    /// Override settings file inside `dir`.
    pub settings_file: String,
    /// Mods to disable while the profile is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_list: Option<ListSource>,
}

pub type Profiles = BTreeMap<String, ProfileConfig>;

pub(super) fn default_profiles() -> Profiles {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "potato".to_string(),
        ProfileConfig {
            dir: "potato".to_string(),
            settings_file: "potato.txt".to_string(),
            disable_list: Some(ListSource::from("https://pastebin.com/raw/ahiJPFqU")),
        },
    );
    profiles
}

/// Shader preset files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadersConfig {
    /// Directory holding the preset files, relative to the instance root.
    pub source_dir: String,
    /// Preset applied for "off".
    pub off_file: String,
    /// Preset applied for "alternate".
    pub alternate_file: String,
    /// File the preset is written to, relative to the instance root.
    pub target: String,
}

impl Default for ShadersConfig {
    fn default() -> Self {
        Self {
            source_dir: "potato".to_string(),
            off_file: "iris.properties".to_string(),
            alternate_file: "iris-alternate.properties".to_string(),
            target: "config/iris.properties".to_string(),
        }
    }
}

/// Change-report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotConfig {
    /// File names never listed in a snapshot.
    pub excluded_files: Vec<String>,
    /// Tracked directories that take part in the change report.
    pub diff_paths: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            excluded_files: vec!["Cobblemon-neoforge-1.6.1+1.21.1.jar".to_string()],
            diff_paths: vec!["mods".to_string(), "resourcepacks".to_string()],
        }
    }
}

/// User toggle selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModsConfig {
    /// Display name (or raw pattern) -> enabled.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub toggles: BTreeMap<String, bool>,
}
