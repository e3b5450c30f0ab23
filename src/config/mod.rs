// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for packsync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. packsync.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. PACKSYNC_* env vars
//! 5. --set key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! PACKSYNC_REMOTE__URL=https://...          → remote.url
//! PACKSYNC_GLOBAL__LOG_LEVEL=4               → global.log_level
//! PACKSYNC_SETTINGS__KEYBIND_PREFIX=bind_    → settings.keybind_prefix
//! ```
//!
//! Sections are separated by `__` so that keys may contain `_`.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{
    GlobalConfig, InstanceConfig, ListsConfig, ModsConfig, ProfileConfig, Profiles,
    RemoteConfig, SettingsConfig, ShadersConfig, SnapshotConfig,
};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub remote: RemoteConfig,
    pub instance: InstanceConfig,
    pub settings: SettingsConfig,
    pub lists: ListsConfig,
    /// Named settings profiles.
    pub profiles: Profiles,
    pub shaders: ShadersConfig,
    pub snapshot: SnapshotConfig,
    pub mods: ModsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            remote: RemoteConfig::default(),
            instance: InstanceConfig::default(),
            settings: SettingsConfig::default(),
            lists: ListsConfig::default(),
            profiles: types::default_profiles(),
            shaders: ShadersConfig::default(),
            snapshot: SnapshotConfig::default(),
            mods: ModsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use packsync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("packsync.toml")
    ///     .with_env_prefix("PACKSYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProfile` if no such profile is configured.
    pub fn profile(&self, name: &str) -> std::result::Result<&ProfileConfig, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    /// Validate values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a tracked path is empty, absolute
    /// or escapes the instance root, or if the remote URL is empty.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.remote.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "remote".to_string(),
                key: "url".to_string(),
                message: "remote url must not be empty".to_string(),
            });
        }
        if self.instance.tracked_paths.is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "instance".to_string(),
                key: "tracked_paths".to_string(),
                message: "at least one tracked path is required".to_string(),
            });
        }
        for tracked in &self.instance.tracked_paths {
            if !is_contained_relative(tracked) {
                return Err(ConfigError::InvalidValue {
                    section: "instance".to_string(),
                    key: "tracked_paths".to_string(),
                    message: format!("'{tracked}' must be a relative path inside the instance"),
                });
            }
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert("global.log_level".into(), self.global.log_level.as_u8().to_string());
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );

        options.insert("remote.url".into(), self.remote.url.clone());
        options.insert("remote.name".into(), self.remote.name.clone());
        options.insert("remote.branches".into(), self.remote.branches.join(", "));
        options.insert("remote.temp_branch".into(), self.remote.temp_branch.clone());
        options.insert("remote.shallow".into(), self.remote.shallow.to_string());

        options.insert(
            "instance.tracked_paths".into(),
            self.instance.tracked_paths.join(", "),
        );
        options.insert("instance.mods_dir".into(), self.instance.mods_dir.clone());
        options.insert(
            "instance.settings_file".into(),
            self.instance.settings_file.clone(),
        );
        options.insert("instance.config_dir".into(), self.instance.config_dir.clone());

        options.insert(
            "settings.keybind_prefix".into(),
            self.settings.keybind_prefix.clone(),
        );
        if !self.settings.preserve_keys.is_empty() {
            options.insert(
                "settings.preserve_keys".into(),
                self.settings.preserve_keys.join(", "),
            );
        }

        let fmt_list = |l: &Option<crate::net::ListSource>| {
            l.as_ref().map_or_else(String::new, ToString::to_string)
        };
        options.insert("lists.downloads".into(), fmt_list(&self.lists.downloads));
        options.insert(
            "lists.optional_mods".into(),
            fmt_list(&self.lists.optional_mods),
        );

        for (name, profile) in &self.profiles {
            options.insert(format!("profiles.{name}.dir"), profile.dir.clone());
            options.insert(
                format!("profiles.{name}.settings_file"),
                profile.settings_file.clone(),
            );
            options.insert(
                format!("profiles.{name}.disable_list"),
                fmt_list(&profile.disable_list),
            );
        }

        options.insert("shaders.source_dir".into(), self.shaders.source_dir.clone());
        options.insert("shaders.off_file".into(), self.shaders.off_file.clone());
        options.insert(
            "shaders.alternate_file".into(),
            self.shaders.alternate_file.clone(),
        );
        options.insert("shaders.target".into(), self.shaders.target.clone());

        options.insert(
            "snapshot.excluded_files".into(),
            self.snapshot.excluded_files.join(", "),
        );
        options.insert(
            "snapshot.diff_paths".into(),
            self.snapshot.diff_paths.join(", "),
        );

        for (name, enabled) in &self.mods.toggles {
            options.insert(format!("mods.toggles.{name}"), enabled.to_string());
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

fn is_contained_relative(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
