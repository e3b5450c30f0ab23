// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!      ignore.rs      reset.rs
//!   (.gitignore)   (ResetPlan)
//!         \            |
//!          v           v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .is_repo    .init / .add_remote / .fetch
//!    .remote_url .checkout_force / .ls_remote
//!                .write_ref / .reset_hard / .clean
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for every write.

pub mod backend;
pub mod ignore;
pub mod reset;

#[cfg(test)]
pub(crate) mod fake;
