// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The sync pipeline.
//!
//! ```text
//! SyncOrchestrator::run(request)
//!   1  repository   init / remote url / .gitignore     fatal
//!   2  snapshot     before
//!   3  backup       keybinds, preserved keys, shader target
//!   4  reset        fetch, clear tracked paths, ResetPlan   fatal
//!   5  restore      keybinds; large artifact downloads
//!   6  snapshot     after
//!   7  profile      merge overrides, restore again
//!   8  shaders      preset
//!   9  mods         profile disable list, user selections
//!  10  report       ChangeSet + warnings
//! ```
//!
//! Steps 5 to 9 record warnings and carry on; any other error moves the
//! session to `Failed` and is returned.

pub mod events;
pub mod report;
pub mod state;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span};

use crate::config::Config;
use crate::config::types::ProfileConfig;
use crate::error::{FsError, GitError, SyncResult};
use crate::git::backend::GitBackend;
use crate::git::ignore::IgnoreFile;
use crate::git::reset::ResetPlan;
use crate::instance::Instance;
use crate::mods::optional::{self, OptionalMods};
use crate::mods::pattern::PatternMatcher;
use crate::mods::toggle::{self, AppliedChanges};
use crate::mods::{DISABLED_SUFFIX, ModState, list_mods};
use crate::net::{Downloader, artifact_file_name};
use crate::settings::SettingsDocument;
use crate::settings::keybinds::{KeyBackup, restore};
use crate::settings::profile::ProfileMerge;
use crate::snapshot::FileSnapshot;
use crate::snapshot::diff::diff;
use crate::utility::fs::copy::{copy_file_async, remove_path_async};

pub use events::{EventSink, SyncEvent};
pub use report::SyncReport;
pub use state::{Session, SyncState};

/// What to do with the shader settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShaderPreset {
    /// Copy the "off" preset over the target.
    Off,
    /// Copy the alternate preset over the target.
    Alternate,
    /// Keep whatever the remote ships.
    #[default]
    Default,
    /// Put the user's own file back after the reset.
    DontSync,
}

/// Parameters of one sync.
#[derive(Debug, Clone, Builder)]
pub struct SyncRequest {
    #[builder(into, setters(name = with_instance))]
    instance: PathBuf,
    /// Profile merged after the reset.
    #[builder(into, setters(name = with_profile))]
    profile: Option<String>,
    /// Take keybinds from the remote instead of preserving them.
    #[builder(setters(name = with_sync_keybinds), default = false)]
    sync_keybinds: bool,
    #[builder(setters(name = with_shaders), default)]
    shaders: ShaderPreset,
    /// Display name (or raw pattern) -> enabled.
    #[builder(setters(name = with_mod_selections), default)]
    mod_selections: BTreeMap<String, bool>,
    /// Download large artifacts from the download list.
    #[builder(setters(name = with_downloads), default = true)]
    downloads: bool,
}

impl SyncRequest {
    #[must_use]
    pub fn instance(&self) -> &Path {
        &self.instance
    }

    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    #[must_use]
    pub const fn sync_keybinds(&self) -> bool {
        self.sync_keybinds
    }

    #[must_use]
    pub const fn shaders(&self) -> ShaderPreset {
        self.shaders
    }

    #[must_use]
    pub const fn mod_selections(&self) -> &BTreeMap<String, bool> {
        &self.mod_selections
    }

    #[must_use]
    pub const fn downloads(&self) -> bool {
        self.downloads
    }
}

/// Runs sync pipelines against one git backend.
pub struct SyncOrchestrator<'a, G: GitBackend + ?Sized> {
    config: &'a Config,
    git: &'a G,
    events: EventSink,
}

impl<'a, G: GitBackend + ?Sized> SyncOrchestrator<'a, G> {
    #[must_use]
    pub const fn new(config: &'a Config, git: &'a G) -> Self {
        Self {
            config,
            git,
            events: EventSink::none(),
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Run one sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance cannot be opened, the profile is
    /// unknown, repository setup fails, or the working copy cannot be reset.
    pub async fn run(&self, request: &SyncRequest) -> SyncResult<SyncReport> {
        let instance = Instance::open(request.instance(), self.config.instance.clone())?;
        let span = info_span!("sync", instance = %instance.root().display());
        let mut session = Session::new(self.events.clone());

        let result = self
            .pipeline(&instance, request, &mut session)
            .instrument(span)
            .await;
        if result.is_err() {
            session.fail();
        }
        result
    }

    async fn pipeline(
        &self,
        instance: &Instance,
        request: &SyncRequest,
        session: &mut Session,
    ) -> SyncResult<SyncReport> {
        let profile = request
            .profile()
            .map(|name| self.config.profile(name))
            .transpose()?;

        session.progress(0, "preparing repository");
        self.setup_repository(instance, session).await?;
        session.advance(SyncState::RepositoryReady)?;

        let before = self.snapshot(instance)?;
        session.progress(10, "backing up settings");
        self.backup(instance, request, session)?;

        session.progress(15, "fetching remote");
        self.fetch(instance.root())?;
        session.progress(30, "clearing tracked paths");
        self.clear_tracked(instance, session).await?;
        session.progress(40, "resetting working copy");
        let reset_via = ResetPlan::from_config(&self.config.remote).execute(self.git, instance.root())?;
        self.reconcile_disabled(instance, session).await;
        session.advance(SyncState::Reset)?;

        session.progress(50, "restoring settings");
        self.restore_settings(instance, session);
        let downloads = if request.downloads() {
            self.download_artifacts(instance, session).await
        } else {
            0
        };
        session.advance(SyncState::Restored)?;

        let after = snapshot_or_warn(self.snapshot(instance), session);
        let mut patterns = Vec::new();
        if let Some(profile) = profile {
            session.progress(75, "applying profile");
            self.apply_profile(instance, request, profile, session).await;
            self.restore_settings(instance, session);
            patterns.extend(self.profile_disable_patterns(instance, profile, session).await);
        }
        session.progress(80, "applying shader preset");
        self.apply_shaders(instance, request.shaders(), session).await;
        session.advance(SyncState::ProfileApplied)?;

        session.progress(85, "toggling mods");
        patterns.extend(self.selection_patterns(instance, request, session).await);
        let mods = self.toggle_mods(instance, &patterns, session);
        session.advance(SyncState::ModsToggled)?;

        session.progress(95, "computing changes");
        let changes = diff(&before, &after, &self.config.snapshot.diff_paths);
        info!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            updated = changes.updated.len(),
            "changes computed"
        );
        session.advance(SyncState::Reported)?;
        session.advance(SyncState::Done)?;
        session.progress(100, "sync complete");

        Ok(SyncReport {
            state: session.state(),
            reset_via,
            changes,
            mods,
            downloads,
            warnings: session.take_warnings(),
        })
    }

    fn snapshot(&self, instance: &Instance) -> SyncResult<FileSnapshot> {
        FileSnapshot::take(
            instance.root(),
            instance.tracked_paths(),
            &self.config.snapshot.excluded_files,
        )
    }

    // --- step 1 ---

    async fn setup_repository(&self, instance: &Instance, session: &mut Session) -> SyncResult<()> {
        let root = instance.root();
        let remote = &self.config.remote;

        if self.git.is_git_repo(root) {
            match self.git.remote_url(root, &remote.name)? {
                Some(url) if url == remote.url => debug!(url = %url, "remote unchanged"),
                Some(url) => {
                    info!(from = %url, to = %remote.url, "updating remote url");
                    self.git.set_remote_url(root, &remote.name, &remote.url)?;
                }
                None => self.git.add_remote(root, &remote.name, &remote.url)?,
            }
        } else {
            session.info(format!("initializing repository in {}", root.display()));
            self.git.init(root)?;
            self.git.add_remote(root, &remote.name, &remote.url)?;
        }

        write_ignore_file(self.config, instance, session).await
    }

    // --- step 3 ---

    fn backup(
        &self,
        instance: &Instance,
        request: &SyncRequest,
        session: &mut Session,
    ) -> SyncResult<()> {
        let doc = SettingsDocument::load_optional(&instance.settings_path())?.unwrap_or_default();
        let settings = &self.config.settings;

        let mut backup = if request.sync_keybinds() {
            KeyBackup::new()
        } else {
            KeyBackup::backup(&doc, &settings.keybind_prefix)
        };
        backup.extend_keys(&doc, &settings.preserve_keys);
        debug!(keys = backup.len(), "settings backed up");
        session.key_backup = backup;

        if request.shaders() == ShaderPreset::DontSync {
            let target = instance.join(&self.config.shaders.target);
            session.shader_backup = if target.is_file() {
                Some(std::fs::read(&target).map_err(|e| FsError::io(&target, e))?)
            } else {
                None
            };
        }
        Ok(())
    }

    // --- step 4 ---

    /// Fetch every configured branch, falling back to a plain fetch.
    ///
    /// Runs before anything is cleared, so an unreachable remote leaves the
    /// instance untouched.
    fn fetch(&self, root: &Path) -> SyncResult<()> {
        let remote = &self.config.remote;
        let mut fetched = 0;
        for branch in &remote.branches {
            match self.git.fetch(root, &remote.name, Some(branch), remote.shallow) {
                Ok(()) => fetched += 1,
                Err(e) => debug!(branch = %branch, error = %e, "branch fetch failed"),
            }
        }
        if fetched > 0 {
            return Ok(());
        }

        self.git
            .fetch(root, &remote.name, None, remote.shallow)
            .map_err(|e| {
                GitError::FetchFailed {
                    remote: remote.name.clone(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Remove the tracked paths. The mods directory keeps disabled mods and
    /// already downloaded artifacts.
    async fn clear_tracked(&self, instance: &Instance, session: &Session) -> SyncResult<()> {
        let keep: Vec<&str> = session
            .download_urls
            .iter()
            .flatten()
            .filter_map(|url| artifact_file_name(url))
            .collect();

        for rel in instance.tracked_paths() {
            let path = instance.join(rel);
            if instance.is_mods_dir(rel) && path.is_dir() {
                let mut entries = tokio::fs::read_dir(&path)
                    .await
                    .map_err(|e| FsError::io(&path, e))?;
                while let Some(entry) = entries
                    .next_entry()
                    .await
                    .map_err(|e| FsError::io(&path, e))?
                {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if name.ends_with(DISABLED_SUFFIX) || keep.contains(&name.as_str()) {
                        continue;
                    }
                    remove_path_async(&entry.path()).await?;
                }
            } else {
                remove_path_async(&path).await?;
            }
        }
        debug!("tracked paths cleared");
        Ok(())
    }

    /// A mod the user had disabled stays disabled when the remote brings
    /// back its enabled file.
    async fn reconcile_disabled(&self, instance: &Instance, session: &Session) {
        let Ok(mods) = list_mods(&instance.mods_dir()) else {
            return;
        };
        for disabled in mods.iter().filter(|m| m.state() == ModState::Disabled) {
            let enabled = instance
                .mods_dir()
                .join(disabled.file_name_for(ModState::Enabled));
            if enabled.is_file() && remove_path_async(&enabled).await.is_ok() {
                session.info(format!("kept {} disabled", disabled.base_name()));
            }
        }
    }

    // --- step 5 ---

    fn restore_settings(&self, instance: &Instance, session: &mut Session) {
        if session.key_backup.is_empty() {
            return;
        }
        let path = instance.settings_path();
        let result = SettingsDocument::load_optional(&path).and_then(|doc| {
            let restored = restore(&doc.unwrap_or_default(), &session.key_backup);
            restored.save(&path)
        });
        match result {
            Ok(()) => debug!(keys = session.key_backup.len(), "settings restored"),
            Err(e) => session.warn(format!("could not restore preserved settings: {e}")),
        }
    }

    async fn download_artifacts(&self, instance: &Instance, session: &mut Session) -> usize {
        let Some(urls) = session.download_urls.clone() else {
            return 0;
        };
        let mods_dir = instance.mods_dir();
        let total = urls.len();
        let mut downloaded = 0;

        for (i, url) in urls.iter().enumerate() {
            let Some(name) = artifact_file_name(url) else {
                session.warn(format!("no file name in download url {url}"));
                continue;
            };
            let target = mods_dir.join(name);
            let twin = mods_dir.join(format!("{name}{DISABLED_SUFFIX}"));
            if target.exists() || twin.exists() {
                debug!(file = %name, "artifact present");
                continue;
            }

            #[allow(clippy::cast_possible_truncation)]
            let percent = 55 + (i * 15 / total.max(1)) as u8;
            session.progress(percent, format!("downloading {name} ({}/{total})", i + 1));
            match Downloader::new().url(url).file(&target).silent().download().await {
                Ok(()) => downloaded += 1,
                Err(e) => session.warn(format!("download of {name} failed: {e}")),
            }
        }
        downloaded
    }

    // --- step 7 ---

    async fn apply_profile(
        &self,
        instance: &Instance,
        request: &SyncRequest,
        profile: &ProfileConfig,
        session: &mut Session,
    ) {
        let profile_dir = instance.join(&profile.dir);
        if !profile_dir.join(&profile.settings_file).is_file() {
            session.warn(format!(
                "profile settings {} not found, skipping profile",
                profile_dir.join(&profile.settings_file).display()
            ));
            return;
        }

        let merge = ProfileMerge::new(
            self.config.settings.keybind_prefix.clone(),
            !request.sync_keybinds(),
        );
        match merge
            .apply_dir(
                &profile_dir,
                &profile.settings_file,
                &instance.settings_path(),
                &instance.config_dir(),
            )
            .await
        {
            Ok((_, copied)) => session.info(format!(
                "profile applied, {} config file(s) copied",
                copied.len()
            )),
            Err(e) => session.warn(format!("profile merge failed: {e}")),
        }
    }

    async fn profile_disable_patterns(
        &self,
        instance: &Instance,
        profile: &ProfileConfig,
        session: &mut Session,
    ) -> Vec<(PatternMatcher, ModState)> {
        let Some(source) = &profile.disable_list else {
            return Vec::new();
        };
        let names = match source.fetch_lines(instance.root()).await {
            Ok(names) => names,
            Err(e) => {
                session.warn(format!("profile disable list unavailable: {e}"));
                return Vec::new();
            }
        };

        let mut patterns = Vec::with_capacity(names.len());
        for name in &names {
            match PatternMatcher::substring(name) {
                Ok(matcher) => patterns.push((matcher, ModState::Disabled)),
                Err(e) => session.warn(format!("invalid disable entry '{name}': {e}")),
            }
        }
        patterns
    }

    // --- step 8 ---

    async fn apply_shaders(&self, instance: &Instance, preset: ShaderPreset, session: &mut Session) {
        let shaders = &self.config.shaders;
        let target = instance.join(&shaders.target);
        let source_dir = instance.join(&shaders.source_dir);

        let source = match preset {
            ShaderPreset::Default => return,
            ShaderPreset::Off => source_dir.join(&shaders.off_file),
            ShaderPreset::Alternate => source_dir.join(&shaders.alternate_file),
            ShaderPreset::DontSync => {
                match session.shader_backup.take() {
                    Some(bytes) => {
                        if let Err(e) = write_file(&target, &bytes).await {
                            session.warn(format!("could not restore shader settings: {e}"));
                        }
                    }
                    None => session.warn(format!(
                        "no shader settings at {} to keep",
                        target.display()
                    )),
                }
                return;
            }
        };

        if !source.is_file() {
            session.warn(format!("shader preset {} not found", source.display()));
            return;
        }
        match copy_file_async(&source, &target).await {
            Ok(()) => debug!(source = %source.display(), "shader preset applied"),
            Err(e) => session.warn(format!("could not apply shader preset: {e}")),
        }
    }

    // --- step 9 ---

    async fn selection_patterns(
        &self,
        instance: &Instance,
        request: &SyncRequest,
        session: &mut Session,
    ) -> Vec<(PatternMatcher, ModState)> {
        let selections = request.mod_selections();
        if selections.is_empty() {
            return Vec::new();
        }

        let list = match &self.config.lists.optional_mods {
            None => None,
            Some(source) => match source.fetch_lines(instance.root()).await {
                Ok(lines) => {
                    let (list, rejects) = OptionalMods::parse(&lines);
                    for line in rejects {
                        session.warn(format!("malformed optional mod line '{line}'"));
                    }
                    Some(list)
                }
                Err(e) => {
                    session.warn(format!("optional mod list unavailable, selections skipped: {e}"));
                    return Vec::new();
                }
            },
        };

        let resolved = optional::resolve(list.as_ref(), selections);
        for warning in resolved.warnings {
            session.warn(warning);
        }
        resolved.patterns
    }

    fn toggle_mods(
        &self,
        instance: &Instance,
        patterns: &[(PatternMatcher, ModState)],
        session: &mut Session,
    ) -> AppliedChanges {
        if patterns.is_empty() {
            return AppliedChanges::default();
        }
        let mut files = match list_mods(&instance.mods_dir()) {
            Ok(files) => files,
            Err(e) => {
                session.warn(format!("could not list mods: {e}"));
                return AppliedChanges::default();
            }
        };

        let changes = toggle::apply(patterns, &mut files);
        for (file, reason) in &changes.failures {
            session.warn(format!("could not toggle {file}: {reason}"));
        }
        info!(
            enabled = changes.enabled.len(),
            disabled = changes.disabled.len(),
            unchanged = changes.unchanged,
            "mods toggled"
        );
        changes
    }
}

/// Generate `<root>/.gitignore`, ignoring every artifact of the download list.
///
/// An unreachable list is a warning; the first excluded snapshot file is
/// ignored in its place. The fetched list is kept in the session.
///
/// # Errors
///
/// Returns `FsError::IoError` if the file cannot be written.
pub async fn write_ignore_file(
    config: &Config,
    instance: &Instance,
    session: &mut Session,
) -> SyncResult<()> {
    let mut ignore = IgnoreFile::new(instance.tracked_paths(), &instance.layout().mods_dir);
    if let Some(source) = &config.lists.downloads {
        match source.fetch_lines(instance.root()).await {
            Ok(urls) => {
                ignore = ignore.with_download_urls(&urls);
                session.download_urls = Some(urls);
            }
            Err(e) => {
                session.warn(format!("download list unavailable: {e}"));
                if let Some(name) = config.snapshot.excluded_files.first() {
                    ignore = ignore.with_large_file(name.clone());
                }
            }
        }
    }
    ignore.write(instance.root())
}

async fn write_file(path: &Path, bytes: &[u8]) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FsError::io(parent, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| FsError::io(path, e))?;
    Ok(())
}

/// The post-reset snapshot, or an empty one with a warning.
///
/// The working copy is already reset at this point, so a failed walk only
/// costs the change report.
fn snapshot_or_warn(result: SyncResult<FileSnapshot>, session: &mut Session) -> FileSnapshot {
    result.unwrap_or_else(|e| {
        session.warn(format!("could not snapshot tracked paths after reset: {e}"));
        FileSnapshot::default()
    })
}
