// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory git backend for unit tests.
//!
//! Records every call as a string (`"fetch origin main"`), fails calls that
//! start with a configured prefix, and writes a fixed file tree into the
//! work tree on every successful checkout.

use std::cell::{Cell, RefCell};
use std::path::Path;

use super::backend::{GitMutation, GitQuery};
use crate::error::{GitError, SyncResult};

#[derive(Debug, Default)]
pub struct FakeGit {
    pub repo: Cell<bool>,
    pub remote: RefCell<Option<String>>,
    pub calls: RefCell<Vec<String>>,
    pub failing: Vec<String>,
    pub refs: Vec<(String, String)>,
    pub tree: Vec<(String, String)>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    pub fn with_ref(mut self, oid: &str, name: &str) -> Self {
        self.refs.push((oid.to_string(), name.to_string()));
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.tree.push((path.to_string(), content.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> SyncResult<()> {
        let fails = self.failing.iter().any(|p| call.starts_with(p.as_str()));
        self.calls.borrow_mut().push(call.clone());
        if fails {
            return Err(GitError::CommandFailed {
                command: call,
                message: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn write_tree(&self, root: &Path) {
        for (path, content) in &self.tree {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(target, content).unwrap();
        }
    }
}

impl GitQuery for FakeGit {
    fn is_git_repo(&self, _root: &Path) -> bool {
        self.repo.get()
    }

    fn remote_url(&self, _root: &Path, _name: &str) -> SyncResult<Option<String>> {
        Ok(self.remote.borrow().clone())
    }
}

impl GitMutation for FakeGit {
    fn init(&self, _root: &Path) -> SyncResult<()> {
        self.record("init".to_string())?;
        self.repo.set(true);
        Ok(())
    }

    fn add_remote(&self, _root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.record(format!("add_remote {name} {url}"))?;
        *self.remote.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    fn set_remote_url(&self, _root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.record(format!("set_remote_url {name} {url}"))?;
        *self.remote.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    fn fetch(
        &self,
        _root: &Path,
        remote: &str,
        refspec: Option<&str>,
        _shallow: bool,
    ) -> SyncResult<()> {
        match refspec {
            Some(spec) => self.record(format!("fetch {remote} {spec}")),
            None => self.record(format!("fetch {remote}")),
        }
    }

    fn checkout_force(&self, root: &Path, what: &str) -> SyncResult<()> {
        self.record(format!("checkout {what}"))?;
        self.write_tree(root);
        Ok(())
    }

    fn ls_remote(&self, _root: &Path, remote: &str) -> SyncResult<Vec<(String, String)>> {
        self.record(format!("ls_remote {remote}"))?;
        Ok(self.refs.clone())
    }

    fn write_ref(&self, _root: &Path, name: &str, oid: &str) -> SyncResult<()> {
        self.record(format!("write_ref {name} {oid}"))
    }

    fn reset_hard(&self, _root: &Path) -> SyncResult<()> {
        self.record("reset_hard".to_string())
    }

    fn clean(&self, _root: &Path, excludes: &[&str]) -> SyncResult<()> {
        self.record(format!("clean {}", excludes.join(" ")))
    }
}
