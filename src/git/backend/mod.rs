// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend   (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//!          \               /
//!           SystemGit: both, delegating
//! ```
//!
//! Methods take `&self` so the orchestrator can run against any backend.

use crate::error::{GitError, GixError, SyncResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::trace;

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Whether `root` is itself the work tree root of a repository.
    ///
    /// A repository further up the directory tree does not count.
    fn is_git_repo(&self, root: &Path) -> bool;

    /// Fetch URL of remote `name`, `None` if the remote is not configured.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn remote_url(&self, root: &Path, name: &str) -> SyncResult<Option<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository state.
pub trait GitMutation {
    /// Initialize a new repository in `root`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository initialization fails.
    fn init(&self, root: &Path) -> SyncResult<()>;

    /// Add a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be added.
    fn add_remote(&self, root: &Path, name: &str, url: &str) -> SyncResult<()>;

    /// Point an existing remote at `url`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the URL cannot be set.
    fn set_remote_url(&self, root: &Path, name: &str, url: &str) -> SyncResult<()>;

    /// Fetch from `remote`, optionally a single refspec, optionally depth 1.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch fails.
    fn fetch(&self, root: &Path, remote: &str, refspec: Option<&str>, shallow: bool)
    -> SyncResult<()>;

    /// `checkout -f`: discard local changes to tracked files.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout fails.
    fn checkout_force(&self, root: &Path, what: &str) -> SyncResult<()>;

    /// Refs advertised by `remote` as `(oid, ref name)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be listed.
    fn ls_remote(&self, root: &Path, remote: &str) -> SyncResult<Vec<(String, String)>>;

    /// Create or move ref `name` to `oid`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the ref cannot be written.
    fn write_ref(&self, root: &Path, name: &str, oid: &str) -> SyncResult<()>;

    /// `reset --hard` to HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reset fails.
    fn reset_hard(&self, root: &Path) -> SyncResult<()>;

    /// Remove untracked files and directories, except those matching
    /// `excludes`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clean fails.
    fn clean(&self, root: &Path, excludes: &[&str]) -> SyncResult<()>;
}

/// Everything the orchestrator needs from git.
pub trait GitBackend: GitQuery + GitMutation {}

impl<T: GitQuery + GitMutation> GitBackend for T {}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only, no subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(&self, root: &Path) -> bool {
        let Ok(repo) = gix::open(root) else {
            return false;
        };
        let Some(workdir) = repo.workdir() else {
            return false;
        };
        match (workdir.canonicalize(), root.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn remote_url(&self, root: &Path, name: &str) -> SyncResult<Option<String>> {
        let repo = gix::open(root).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))?;
        match repo.find_remote(name) {
            Ok(remote) => Ok(remote
                .url(gix::remote::Direction::Fetch)
                .map(|url| url.to_bstring().to_string())),
            Err(gix::remote::find::existing::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(GitError::Gix(GixError::Remote(Box::new(e))).into()),
        }
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Writes go through the real executable so fetch transports, credential
/// helpers and ref updates behave exactly like the user's git.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    git: PathBuf,
}

impl ShellBackend {
    /// Locate `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::GitNotFound` if no executable is found.
    pub fn new() -> SyncResult<Self> {
        let git = which::which("git").map_err(|_| GitError::GitNotFound)?;
        Ok(Self { git })
    }

    /// Use a specific git executable.
    #[must_use]
    pub fn with_executable(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(&self, args: &[&str], cwd: &Path) -> SyncResult<String> {
        trace!(args = ?args, cwd = %cwd.display(), "git");
        let output = Command::new(&self.git)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitMutation for ShellBackend {
    fn init(&self, root: &Path) -> SyncResult<()> {
        self.git_command(&["init", "--quiet"], root)?;
        Ok(())
    }

    fn add_remote(&self, root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.git_command(&["remote", "add", name, url], root)?;
        Ok(())
    }

    fn set_remote_url(&self, root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.git_command(&["remote", "set-url", name, url], root)?;
        Ok(())
    }

    fn fetch(
        &self,
        root: &Path,
        remote: &str,
        refspec: Option<&str>,
        shallow: bool,
    ) -> SyncResult<()> {
        let mut args = vec!["fetch", "--quiet"];
        if shallow {
            args.extend(["--depth", "1"]);
        }
        args.push(remote);
        if let Some(spec) = refspec {
            args.push(spec);
        }
        self.git_command(&args, root)
            .map_err(|e| GitError::FetchFailed {
                remote: remote.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn checkout_force(&self, root: &Path, what: &str) -> SyncResult<()> {
        self.git_command(
            &["-c", "advice.detachedHead=false", "checkout", "-q", "-f", what],
            root,
        )?;
        Ok(())
    }

    fn ls_remote(&self, root: &Path, remote: &str) -> SyncResult<Vec<(String, String)>> {
        let output = self.git_command(&["ls-remote", remote], root)?;
        Ok(output
            .lines()
            .filter_map(|line| {
                let (oid, name) = line.split_once(char::is_whitespace)?;
                Some((oid.trim().to_string(), name.trim().to_string()))
            })
            .collect())
    }

    fn write_ref(&self, root: &Path, name: &str, oid: &str) -> SyncResult<()> {
        self.git_command(&["update-ref", name, oid], root)?;
        Ok(())
    }

    fn reset_hard(&self, root: &Path) -> SyncResult<()> {
        self.git_command(&["reset", "--hard", "--quiet"], root)?;
        Ok(())
    }

    fn clean(&self, root: &Path, excludes: &[&str]) -> SyncResult<()> {
        let mut args = vec!["clean", "-f", "-d", "--quiet"];
        for pattern in excludes {
            args.extend(["-e", *pattern]);
        }
        self.git_command(&args, root)?;
        Ok(())
    }
}

// --- SystemGit (both backends) ---

/// gix for reads, the git CLI for writes.
#[derive(Debug, Clone)]
pub struct SystemGit {
    query: GixBackend,
    shell: ShellBackend,
}

impl SystemGit {
    /// # Errors
    ///
    /// Returns `GitError::GitNotFound` if git is not on `PATH`.
    pub fn new() -> SyncResult<Self> {
        Ok(Self {
            query: GixBackend,
            shell: ShellBackend::new()?,
        })
    }
}

impl GitQuery for SystemGit {
    fn is_git_repo(&self, root: &Path) -> bool {
        self.query.is_git_repo(root)
    }

    fn remote_url(&self, root: &Path, name: &str) -> SyncResult<Option<String>> {
        self.query.remote_url(root, name)
    }
}

impl GitMutation for SystemGit {
    fn init(&self, root: &Path) -> SyncResult<()> {
        self.shell.init(root)
    }

    fn add_remote(&self, root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.shell.add_remote(root, name, url)
    }

    fn set_remote_url(&self, root: &Path, name: &str, url: &str) -> SyncResult<()> {
        self.shell.set_remote_url(root, name, url)
    }

    fn fetch(
        &self,
        root: &Path,
        remote: &str,
        refspec: Option<&str>,
        shallow: bool,
    ) -> SyncResult<()> {
        self.shell.fetch(root, remote, refspec, shallow)
    }

    fn checkout_force(&self, root: &Path, what: &str) -> SyncResult<()> {
        self.shell.checkout_force(root, what)
    }

    fn ls_remote(&self, root: &Path, remote: &str) -> SyncResult<Vec<(String, String)>> {
        self.shell.ls_remote(root, remote)
    }

    fn write_ref(&self, root: &Path, name: &str, oid: &str) -> SyncResult<()> {
        self.shell.write_ref(root, name, oid)
    }

    fn reset_hard(&self, root: &Path) -> SyncResult<()> {
        self.shell.reset_hard(root)
    }

    fn clean(&self, root: &Path, excludes: &[&str]) -> SyncResult<()> {
        self.shell.clean(root, excludes)
    }
}
