// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal and async copy.
//!
//! ```text
//! walk:  parallel_walk()  ignore::WalkParallel (multi-core), sorted output
//!        WalkOptions      max_depth, hidden, gitignore, skip_dirs
//! copy:  copy_files_except_async()  top-level files, overwrite
//!        copy_file_async()          single file, parents created
//!        remove_path_async()        file or tree, missing is fine
//! ```

pub mod copy;
pub mod walk;
