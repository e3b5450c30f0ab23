// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered reset strategies.
//!
//! ```text
//! ResetPlan [ Checkout origin/main, Checkout origin/master, RemoteHead ]
//!              |  fail               |  fail                 |  fail
//!              +-------------------->+---------------------->+--> ResetExhausted
//!              | ok                  | ok                    | ok
//!              v                     v                       v
//!          strategy that succeeded is returned
//! ```
//!
//! Remote head: `ls-remote`, pick `refs/heads/<preferred>` in order, else
//! `HEAD`, fetch that oid, point `refs/heads/<temp>` at it, force-checkout,
//! hard reset, then clean everything except `*.disabled`.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::backend::GitMutation;
use crate::config::types::RemoteConfig;
use crate::error::{GitError, SyncResult};

/// Files the post-reset clean never removes.
pub const CLEAN_EXCLUDES: &[&str] = &["*.disabled"];

/// One way of bringing the working copy to the remote revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResetStrategy {
    /// Force-checkout a fetched ref such as `origin/main`.
    Checkout { target: String },
    /// Resolve the remote's advertised head and check it out on a temp branch.
    RemoteHead {
        temp_branch: String,
        preferred: Vec<String>,
    },
}

impl fmt::Display for ResetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout { target } => write!(f, "checkout {target}"),
            Self::RemoteHead { temp_branch, .. } => write!(f, "remote head via {temp_branch}"),
        }
    }
}

impl ResetStrategy {
    fn run<G: GitMutation + ?Sized>(
        &self,
        git: &G,
        root: &Path,
        remote: &str,
        shallow: bool,
    ) -> SyncResult<()> {
        match self {
            Self::Checkout { target } => git.checkout_force(root, target),
            Self::RemoteHead {
                temp_branch,
                preferred,
            } => {
                let refs = git.ls_remote(root, remote)?;
                let oid = pick_head(&refs, preferred).ok_or_else(|| {
                    GitError::RemoteHeadNotFound {
                        remote: remote.to_string(),
                    }
                })?;
                git.fetch(root, remote, Some(oid), shallow)?;
                let local_ref = format!("refs/heads/{temp_branch}");
                git.write_ref(root, &local_ref, oid)?;
                git.checkout_force(root, temp_branch)?;
                git.reset_hard(root)?;
                git.clean(root, CLEAN_EXCLUDES)
            }
        }
    }
}

/// The oid of the first preferred branch the remote advertises, else of `HEAD`.
#[must_use]
pub fn pick_head<'a>(refs: &'a [(String, String)], preferred: &[String]) -> Option<&'a str> {
    let find = |name: &str| {
        refs.iter()
            .find(|(_, r)| r == name)
            .map(|(oid, _)| oid.as_str())
    };
    preferred
        .iter()
        .find_map(|branch| find(&format!("refs/heads/{branch}")))
        .or_else(|| find("HEAD"))
}

/// Reset strategies in the order they are attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPlan {
    remote: String,
    shallow: bool,
    strategies: Vec<ResetStrategy>,
}

impl ResetPlan {
    #[must_use]
    pub const fn new(remote: String, shallow: bool, strategies: Vec<ResetStrategy>) -> Self {
        Self {
            remote,
            shallow,
            strategies,
        }
    }

    /// `<remote>/<branch>` for every configured branch, then the remote head.
    #[must_use]
    pub fn from_config(remote: &RemoteConfig) -> Self {
        let mut strategies: Vec<ResetStrategy> = remote
            .branches
            .iter()
            .map(|branch| ResetStrategy::Checkout {
                target: format!("{}/{branch}", remote.name),
            })
            .collect();
        strategies.push(ResetStrategy::RemoteHead {
            temp_branch: remote.temp_branch.clone(),
            preferred: remote.branches.clone(),
        });
        Self::new(remote.name.clone(), remote.shallow, strategies)
    }

    #[must_use]
    pub fn strategies(&self) -> &[ResetStrategy] {
        &self.strategies
    }

    /// Try each strategy in order until one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ResetExhausted` listing every failed attempt.
    pub fn execute<G: GitMutation + ?Sized>(
        &self,
        git: &G,
        root: &Path,
    ) -> SyncResult<ResetStrategy> {
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.run(git, root, &self.remote, self.shallow) {
                Ok(()) => {
                    info!(strategy = %strategy, "working copy reset");
                    return Ok(strategy.clone());
                }
                Err(e) => {
                    warn!(strategy = %strategy, error = %e, "reset strategy failed");
                    attempts.push(format!("{strategy}: {e}"));
                }
            }
        }
        Err(GitError::ResetExhausted { attempts }.into())
    }
}
