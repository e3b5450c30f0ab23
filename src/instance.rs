// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The instance directory and its exclusive lock.
//!
//! ```text
//! <root>/
//!   .git/  .gitignore  .packsync.lock
//!   config/  mods/  options.txt  ...      tracked paths
//!   saves/  screenshots/  ...             never touched
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::config::types::InstanceConfig;
use crate::error::{FsError, SyncResult};

/// Lock file created in the instance root while a sync runs.
pub const LOCK_FILE: &str = ".packsync.lock";

/// One game instance, identified by its absolute root.
#[derive(Debug, Clone)]
pub struct Instance {
    root: PathBuf,
    layout: InstanceConfig,
}

impl Instance {
    /// Open an existing instance directory.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `root` is not a directory, or
    /// `FsError::IoError` if it cannot be made absolute.
    pub fn open(root: impl AsRef<Path>, layout: InstanceConfig) -> SyncResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(FsError::NotFound(root.display().to_string()).into());
        }
        let root = std::path::absolute(root).map_err(|e| FsError::io(root, e))?;
        Ok(Self { root, layout })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn layout(&self) -> &InstanceConfig {
        &self.layout
    }

    #[must_use]
    pub fn tracked_paths(&self) -> &[String] {
        &self.layout.tracked_paths
    }

    #[must_use]
    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    #[must_use]
    pub fn mods_dir(&self) -> PathBuf {
        self.join(&self.layout.mods_dir)
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.join(&self.layout.settings_file)
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.join(&self.layout.config_dir)
    }

    /// Whether `rel` is the mods directory.
    #[must_use]
    pub fn is_mods_dir(&self, rel: &str) -> bool {
        rel.trim_end_matches('/') == self.layout.mods_dir.trim_end_matches('/')
    }

    /// Take the exclusive instance lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns `FsError::Locked` if another process holds the lock, or
    /// `FsError::IoError` if the lock file cannot be opened.
    pub fn lock(&self) -> SyncResult<InstanceLock> {
        let path = self.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| FsError::io(&path, e))?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                debug!(path = %path.display(), "instance locked");
                Ok(InstanceLock { file, path })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Err(FsError::Locked {
                path: path.display().to_string(),
            }
            .into()),
            Err(e) => Err(FsError::io(&path, e).into()),
        }
    }
}

/// Held for the duration of a sync. Released on drop.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
