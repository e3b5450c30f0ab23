// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   walk:  parallel_walk(), WalkOptions
//!   copy:  copy_files_except_async(), copy_file_async(), remove_path_async()
//! ```

pub mod fs;
