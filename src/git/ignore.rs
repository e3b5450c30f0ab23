// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The instance's generated `.gitignore`.
//!
//! Everything is ignored except the tracked paths; large artifacts that are
//! downloaded separately are ignored again inside the mods directory.

use std::path::Path;

use crate::error::{FsError, SyncResult};
use crate::net::artifact_file_name;

/// File name of the generated ignore file.
pub const IGNORE_FILE: &str = ".gitignore";

/// Contents of a generated ignore file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreFile {
    tracked: Vec<String>,
    mods_dir: String,
    large_files: Vec<String>,
}

impl IgnoreFile {
    #[must_use]
    pub fn new<S: AsRef<str>>(tracked: &[S], mods_dir: &str) -> Self {
        Self {
            tracked: tracked.iter().map(|p| p.as_ref().to_string()).collect(),
            mods_dir: mods_dir.trim_end_matches('/').to_string(),
            large_files: Vec::new(),
        }
    }

    /// Ignore the artifact each download URL is stored as.
    #[must_use]
    pub fn with_download_urls<S: AsRef<str>>(mut self, urls: &[S]) -> Self {
        for url in urls {
            if let Some(name) = artifact_file_name(url.as_ref()) {
                self.large_files.push(name.to_string());
            }
        }
        self
    }

    /// Ignore one artifact by file name.
    #[must_use]
    pub fn with_large_file(mut self, name: impl Into<String>) -> Self {
        self.large_files.push(name.into());
        self
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("# Ignore everything\n*\n\n# Except these folders and files\n");
        for path in &self.tracked {
            let path = path.trim_end_matches('/');
            out.push_str(&format!("!{path}\n"));
            if is_directory_like(path) {
                out.push_str(&format!("!{path}/**\n"));
            }
        }
        out.push_str("\n# Ignore large mod files\n");
        for name in &self.large_files {
            out.push_str(&format!("{}/{name}\n", self.mods_dir));
        }
        out
    }

    /// Write `render()` to `<root>/.gitignore`.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the file cannot be written.
    pub fn write(&self, root: &Path) -> SyncResult<()> {
        let path = root.join(IGNORE_FILE);
        std::fs::write(&path, self.render()).map_err(|e| FsError::io(&path, e))?;
        Ok(())
    }
}

/// A tracked path names a directory unless its last component has an extension.
fn is_directory_like(path: &str) -> bool {
    Path::new(path).extension().is_none()
}
