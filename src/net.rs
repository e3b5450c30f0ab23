// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote text lists and large-artifact downloads.
//!
//! ```text
//! ListSource::Url  --> Downloader::download_string() --+
//! ListSource::Path --> tokio::fs::read_to_string()  ---+--> parse_lines()
//!
//! Downloader::new()
//!   .url() .file() .header() .silent()
//!        |
//!        +--------------+
//!        v              v
//!   download()    download_string()
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Partial files: removed on any error path (RAII guard)
//! ```

use crate::error::{NetworkError, SyncResult};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::io::AsyncWriteExt;

/// RAII guard that removes a partial download file on Drop unless explicitly kept.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Global HTTP client - initialized once, reused across all requests.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("packsync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} @ {binary_bytes_per_sec} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bytes} @ {binary_bytes_per_sec}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
        })
        .clone()
}

/// Async HTTP downloader with builder pattern.
///
/// # Example
/// ```ignore
/// use packsync::net::Downloader;
///
/// Downloader::new()
///     .url("https://example.com/big-mod.jar")
///     .file("/instance/mods/big-mod.jar")
///     .download()
///     .await?;
/// ```
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    headers: Vec<(String, String)>,
    show_progress: bool,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            headers: Vec::new(),
            show_progress: true,
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Disable the progress bar.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn create_progress_bar(&self, total_size: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = if total_size == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb
        } else {
            let pb = ProgressBar::new(total_size);
            pb.set_style(bar_style());
            pb
        };
        Some(pb)
    }

    async fn send(&self) -> SyncResult<(String, reqwest::Response)> {
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| NetworkError::InvalidUrl("no URL provided".to_string()))?;

        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(NetworkError::Reqwest)?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.clone(),
            }
            .into());
        }
        Ok((url.clone(), response))
    }

    /// Download to the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The request fails or returns a non-success status code.
    /// - The output file cannot be created or written to.
    pub async fn download(&self) -> SyncResult<()> {
        let (url, response) = self.send().await?;
        let output = self
            .output_file
            .as_ref()
            .ok_or_else(|| NetworkError::DownloadFailed {
                url: url.clone(),
                message: "no output file specified".to_string(),
            })?;

        let total_size = response.content_length().unwrap_or(0);
        let progress_bar = self.create_progress_bar(total_size);

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!(
                        "failed to create parent directory {}: {}",
                        parent.display(),
                        e
                    ),
                })?;
        }

        let mut file =
            tokio::fs::File::create(output)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!("failed to create output file {}: {}", output.display(), e),
                })?;

        let mut guard = PartialFileGuard::new(output.clone());

        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(NetworkError::Reqwest)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!("failed to write to {}: {}", output.display(), e),
                })?;

            if let Some(pb) = &progress_bar {
                pb.inc(chunk.len() as u64);
            }
        }

        file.flush()
            .await
            .map_err(|e| NetworkError::DownloadFailed {
                url: url.clone(),
                message: format!("failed to flush {}: {}", output.display(), e),
            })?;

        guard.keep();

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        Ok(())
    }

    /// Download and return content as string.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns a non-success status code.
    pub async fn download_string(&self) -> SyncResult<String> {
        let (_, response) = self.send().await?;
        let text = response.text().await.map_err(NetworkError::Reqwest)?;
        Ok(text)
    }
}

/// Where a newline-delimited list comes from.
///
/// Deserialized from a plain string: `http://`/`https://` prefixes select
/// [`ListSource::Url`], anything else is a path relative to the instance root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListSource {
    Url(String),
    Path(PathBuf),
}

impl From<String> for ListSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value)
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl From<&str> for ListSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ListSource> for String {
    fn from(source: ListSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl ListSource {
    /// Fetch the list and return its trimmed, non-blank lines.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if the URL cannot be fetched or the local file
    /// cannot be read.
    pub async fn fetch_lines(&self, instance_root: &Path) -> SyncResult<Vec<String>> {
        let text = match self {
            Self::Url(url) => Downloader::new().url(url).download_string().await?,
            Self::Path(path) => tokio::fs::read_to_string(instance_root.join(path))
                .await
                .map_err(NetworkError::Io)?,
        };
        Ok(parse_lines(&text))
    }
}

/// Split a list body on newlines, trimming each line and dropping blanks.
#[must_use]
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// File name a download URL is stored under: the last path segment,
/// without query string or fragment.
#[must_use]
pub fn artifact_file_name(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    without_query
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}
