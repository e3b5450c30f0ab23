// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, SyncResult};
use std::path::Path;
use tokio::fs;

/// Copies the top-level files of `src` into `dst`, overwriting.
///
/// Files named in `exclude` (exact file names) are skipped, as are
/// subdirectories. Creates `dst` if needed. Returns the copied file names,
/// sorted.
///
/// # Example
/// ```no_run
/// use packsync::utility::fs::copy::copy_files_except_async;
/// use std::path::Path;
///
/// # async fn example() -> packsync::error::SyncResult<()> {
/// let copied = copy_files_except_async(
///     Path::new("/instance/potato"),
///     Path::new("/instance/config"),
///     &["potato.txt"],
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
/// # Errors
///
/// Returns `FsError::IoError` if any IO operation fails (creating directory,
/// reading, copying).
pub async fn copy_files_except_async(
    src: &Path,
    dst: &Path,
    exclude: &[&str],
) -> SyncResult<Vec<String>> {
    fs::create_dir_all(dst)
        .await
        .map_err(|e| FsError::io(dst, e))?;

    let mut entries = fs::read_dir(src).await.map_err(|e| FsError::io(src, e))?;
    let mut copied = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::io(src, e))?
    {
        let src_path = entry.path();
        if !src_path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if exclude.contains(&name.as_str()) {
            continue;
        }

        let dst_path = dst.join(&name);
        fs::copy(&src_path, &dst_path)
            .await
            .map_err(|e| FsError::io(&dst_path, e))?;
        copied.push(name);
    }

    copied.sort();
    Ok(copied)
}

/// Copies one file, creating the destination's parent directories.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `src` is not a file, `FsError::IoError`
/// if the copy fails.
pub async fn copy_file_async(src: &Path, dst: &Path) -> SyncResult<()> {
    if !src.is_file() {
        return Err(FsError::NotFound(src.display().to_string()).into());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| FsError::io(parent, e))?;
    }
    fs::copy(src, dst).await.map_err(|e| FsError::io(dst, e))?;
    Ok(())
}

/// Removes a file or a directory tree. A missing path is not an error.
///
/// # Errors
///
/// Returns `FsError::IoError` if the path exists and cannot be removed.
pub async fn remove_path_async(path: &Path) -> SyncResult<()> {
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FsError::io(path, e).into()),
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    result.map_err(|e| FsError::io(path, e))?;
    Ok(())
}
