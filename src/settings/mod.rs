// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-oriented `key:value` settings documents.
//!
//! ```text
//! "key_jump:key.keyboard.space"  -> Pair  { key_jump, key.keyboard.space }
//! "lastServer:mc.example:25565"  -> Pair  { lastServer, mc.example:25565 }
//! "# comment"                    -> Opaque
//! ""                             -> Blank
//! ```
//!
//! The first `:` separates key and value. `serialize(parse(text)) == text`
//! for every input; only lines touched through [`SettingsDocument::set`] are
//! rewritten. Line endings (`\n` or `\r\n`) are tracked per line and never
//! part of a value.
//!
//! - [`keybinds`]: back up and restore keybind keys across a reset
//! - [`profile`]: merge an override profile into a document

pub mod keybinds;
pub mod profile;


use std::path::Path;

use crate::error::{SettingsError, SyncResult};

/// One line of a settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Empty or whitespace-only line, kept verbatim.
    Blank(String),
    /// `key:value`, split on the first colon.
    Pair { key: String, value: String },
    /// Line without a colon, kept verbatim.
    Opaque(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Blank(raw.to_string())
        } else if let Some((key, value)) = raw.split_once(':') {
            Self::Pair {
                key: key.to_string(),
                value: value.to_string(),
            }
        } else {
            Self::Opaque(raw.to_string())
        }
    }

    /// The key of a `key:value` line.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Pair { key, .. } => Some(key),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Blank(raw) | Self::Opaque(raw) => out.push_str(raw),
            Self::Pair { key, value } => {
                out.push_str(key);
                out.push(':');
                out.push_str(value);
            }
        }
    }
}

/// An ordered sequence of settings lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDocument {
    lines: Vec<Line>,
    /// `crlf[i]`: line `i` is terminated by `\r\n` rather than `\n`.
    crlf: Vec<bool>,
}

impl SettingsDocument {
    /// Parse a document. Never fails: unrecognised lines become opaque.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut crlf = Vec::new();
        let mut parts = text.split('\n').peekable();
        while let Some(raw) = parts.next() {
            let (raw, cr) = match raw.strip_suffix('\r') {
                Some(stripped) if parts.peek().is_some() => (stripped, true),
                _ => (raw, false),
            };
            lines.push(Line::parse(raw));
            crlf.push(cr);
        }
        Self { lines, crlf }
    }

    /// Render the document back to text.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                if self.ends_with_crlf(i - 1) {
                    out.push('\r');
                }
                out.push('\n');
            }
            line.write_to(&mut out);
        }
        out
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Iterate `(key, value)` pairs in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            Line::Pair { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Value of the first occurrence of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Update the first occurrence of `key` in place, or append it.
    pub fn set(&mut self, key: &str, value: &str) {
        let existing = self.lines.iter_mut().find_map(|line| match line {
            Line::Pair { key: k, value: v } if k == key => Some(v),
            _ => None,
        });
        match existing {
            Some(v) => value.clone_into(v),
            None => self.append(key, value),
        }
    }

    /// Append a new `key:value` line.
    ///
    /// A document that ended with a newline keeps ending with one: the pair
    /// goes in front of the empty terminator line. The new line takes the
    /// ending of the line before it.
    pub fn append(&mut self, key: &str, value: &str) {
        let line = Line::Pair {
            key: key.to_string(),
            value: value.to_string(),
        };
        let len = self.lines.len();
        match self.lines.last() {
            Some(Line::Blank(raw)) if raw.is_empty() && len > 1 => {
                let cr = self.ends_with_crlf(len - 2);
                self.lines.insert(len - 1, line);
                self.crlf.insert(len - 1, cr);
            }
            Some(Line::Blank(raw)) if raw.is_empty() => {
                // Parsing "" yields a single empty line; replace it.
                self.lines[0] = line;
            }
            _ => {
                let cr = len > 1 && self.ends_with_crlf(len - 2);
                if let Some(last) = self.crlf.last_mut() {
                    *last = cr;
                }
                self.lines.push(line);
                self.crlf.push(false);
            }
        }
    }

    fn ends_with_crlf(&self, index: usize) -> bool {
        self.crlf.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Read` if the file cannot be read as UTF-8.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Read a settings file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Read` if the file exists but cannot be read.
    pub fn load_optional(path: &Path) -> SyncResult<Option<Self>> {
        if path.is_file() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Write the document atomically: a temp file in the same directory is
    /// renamed over `path`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Write` if the temp file cannot be created,
    /// written or persisted.
    pub fn save(&self, path: &Path) -> SyncResult<()> {
        use std::io::Write;

        let write_err = |source: std::io::Error| SettingsError::Write {
            path: path.display().to_string(),
            source,
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(self.serialize().as_bytes())
            .map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}
