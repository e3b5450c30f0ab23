// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Keybind preservation across destructive resets.
//!
//! ```text
//! before reset:  backup(doc, "key_")  -> KeyBackup { key_forward: w }
//! after reset:   restore(doc, backup) -> replace matching values,
//!                                        append keys the reset dropped
//! ```

use super::{Line, SettingsDocument};

/// Key/value pairs saved from a document, in first-seen order.
///
/// Lives for one sync invocation only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBackup {
    entries: Vec<(String, String)>,
}

impl KeyBackup {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Collect every key starting with `prefix`.
    ///
    /// A key occurring more than once keeps its last value, matching what a
    /// reader of the file would end up with.
    #[must_use]
    pub fn backup(doc: &SettingsDocument, prefix: &str) -> Self {
        let mut backup = Self::new();
        for (key, value) in doc.pairs().filter(|(k, _)| k.starts_with(prefix)) {
            backup.insert(key, value);
        }
        backup
    }

    /// Also save the listed exact keys, where present.
    pub fn extend_keys<S: AsRef<str>>(&mut self, doc: &SettingsDocument, keys: &[S]) {
        for key in keys {
            if let Some(value) = doc.get(key.as_ref()) {
                self.insert(key.as_ref(), value);
            }
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Put backed-up values back into `doc`.
///
/// Every line whose key is in the backup gets the saved value; saved keys the
/// document no longer has are appended in backup order. Everything else is
/// untouched. Applying the same backup twice gives the same document.
#[must_use]
pub fn restore(doc: &SettingsDocument, backup: &KeyBackup) -> SettingsDocument {
    let mut restored = doc.clone();
    if backup.is_empty() {
        return restored;
    }

    for line in restored.lines_mut() {
        if let Line::Pair { key, value } = line
            && let Some(saved) = backup.get(key)
        {
            saved.clone_into(value);
        }
    }

    for (key, value) in backup.iter() {
        if !restored.contains_key(key) {
            restored.append(key, value);
        }
    }

    restored
}
