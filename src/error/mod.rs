// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                SyncError (~24 bytes)
//!                      |
//!   +------+------+----+-----+--------+------+
//!   |      |      |          |        |      |
//!   v      v      v          v        v      v
//! Bail    Git    Net       Cfg    Settings  Fs    Io
//!         Box    Box       Box      Box     Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Git      Gix, CommandFailed, FetchFailed, ResetExhausted
//!   Network  Reqwest, HttpError, DownloadFailed
//!   Config   InvalidValue, UnknownProfile
//!   Settings Read, Write
//!   Fs       NotFound, IoError, Locked
//! ```
//!
//! Everything returned as `Err` is fatal for the current invocation.
//! Recoverable conditions never surface here; the orchestrator records them
//! as warnings on the report instead.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fatal error that should terminate the current operation.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Settings file could not be read or written.
    #[error("settings error: {0}")]
    Settings(#[from] Box<SettingsError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Create a fatal [`SyncError::Bailed`].
pub fn bail_out(message: impl Into<String>) -> SyncError {
    SyncError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    SettingsError => Settings,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to look up a remote.
    #[error("failed to find remote: {0}")]
    Remote(#[from] Box<gix::remote::find::existing::Error>),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git executable could not be located.
    #[error("git executable not found in PATH")]
    GitNotFound,

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Nothing could be fetched from the remote.
    #[error("failed to fetch from {remote}: {message}")]
    FetchFailed { remote: String, message: String },

    /// The remote advertised no usable head ref.
    #[error("remote '{remote}' advertises no usable branch head")]
    RemoteHeadNotFound { remote: String },

    /// Every reset strategy failed.
    #[error("could not reset working copy, tried: {}", attempts.join("; "))]
    ResetExhausted { attempts: Vec<String> },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// I/O error during download or while reading a local list.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// A profile was requested that the configuration does not define.
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

// --- Settings Errors ---

/// Errors reading or writing a `key:value` settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Another invocation holds the instance lock.
    #[error("instance is locked by another sync: {path}")]
    Locked { path: String },
}

impl FsError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
