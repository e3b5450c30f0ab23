// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ChangeSet, FileSnapshot, Update, diff};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn content_dirs() -> Vec<String> {
    vec!["mods".to_string(), "resourcepacks".to_string()]
}

#[test]
fn test_take_lists_tracked_files_only() {
    let temp = temp_dir();
    let root = temp.path();
    std::fs::create_dir_all(root.join("mods/nested")).unwrap();
    std::fs::create_dir_all(root.join("saves/world")).unwrap();
    std::fs::write(root.join("mods/b.jar"), "").unwrap();
    std::fs::write(root.join("mods/nested/a.jar.disabled"), "").unwrap();
    std::fs::write(root.join("mods/Big-1.0.jar"), "").unwrap();
    std::fs::write(root.join("options.txt"), "").unwrap();
    std::fs::write(root.join("saves/world/level.dat"), "").unwrap();

    let snap = FileSnapshot::take(
        root,
        &["mods", "options.txt", "shaderpacks"],
        &["Big-1.0.jar"],
    )
    .unwrap();

    insta::assert_debug_snapshot!(snap.iter().collect::<Vec<_>>(), @r#"
    [
        "mods/b.jar",
        "mods/nested/a.jar.disabled",
        "options.txt",
    ]
    "#);
}

#[test]
fn test_version_bump_is_an_update() {
    let before = FileSnapshot::from_paths(["mods/a-1.0.jar"]);
    let after = FileSnapshot::from_paths(["mods/a-2.0.jar"]);

    let changes = diff(&before, &after, &content_dirs());

    assert_eq!(
        changes,
        ChangeSet {
            added: vec![],
            removed: vec![],
            updated: vec![Update {
                from: "mods/a-1.0.jar".to_string(),
                to: "mods/a-2.0.jar".to_string(),
            }],
        }
    );
}

#[test]
fn test_added_and_removed_are_disjoint() {
    let cases = [
        (vec!["mods/a.jar", "mods/b-1.jar"], vec!["mods/b-1.jar", "mods/c.jar"]),
        (vec![], vec!["mods/x-1.jar", "mods/x-2.jar"]),
        (vec!["mods/x-1.jar", "mods/x-2.jar"], vec!["mods/x-3.jar"]),
        (vec!["mods/1.jar", "mods/2.jar"], vec!["mods/3.jar"]),
        (vec!["resourcepacks/p.zip"], vec![]),
    ];
    for (before, after) in cases {
        let changes = diff(
            &FileSnapshot::from_paths(&before),
            &FileSnapshot::from_paths(&after),
            &content_dirs(),
        );
        for path in &changes.added {
            assert!(!changes.removed.contains(path), "{before:?} -> {after:?}");
        }
        for update in &changes.updated {
            assert!(!changes.added.contains(&update.to));
            assert!(!changes.removed.contains(&update.from));
        }
    }
}

#[test]
fn test_unpaired_leftovers_stay_added_or_removed() {
    let before = FileSnapshot::from_paths(["mods/x-1.jar", "mods/x-2.jar"]);
    let after = FileSnapshot::from_paths(["mods/x-3.jar"]);

    let changes = diff(&before, &after, &content_dirs());

    assert_eq!(changes.updated.len(), 1);
    assert_eq!(changes.updated[0].from, "mods/x-1.jar");
    assert_eq!(changes.removed, vec!["mods/x-2.jar"]);
    assert!(changes.added.is_empty());
}

#[test]
fn test_no_pairing_across_directories_or_digit_leading_names() {
    let before = FileSnapshot::from_paths(["mods/a-1.jar", "mods/1x.jar"]);
    let after = FileSnapshot::from_paths(["resourcepacks/a-2.jar", "mods/2x.jar"]);

    let changes = diff(&before, &after, &content_dirs());

    assert!(changes.updated.is_empty());
    assert_eq!(changes.added, vec!["mods/2x.jar", "resourcepacks/a-2.jar"]);
    assert_eq!(changes.removed, vec!["mods/1x.jar", "mods/a-1.jar"]);
}

#[test]
fn test_diff_ignores_paths_outside_diff_dirs() {
    let before = FileSnapshot::from_paths(["config/a.json", "mods/keep.jar"]);
    let after = FileSnapshot::from_paths(["config/b.json", "mods/keep.jar", "modsextra/z.jar"]);

    assert!(diff(&before, &after, &content_dirs()).is_empty());

    let all = diff(&before, &after, &[]);
    assert_eq!(all.added, vec!["config/b.json", "modsextra/z.jar"]);
    assert_eq!(all.removed, vec!["config/a.json"]);
}
