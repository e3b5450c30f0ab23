// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::optional::{OptionalMods, resolve};
use super::pattern::PatternMatcher;
use super::toggle::apply;
use super::{ModFile, ModState, list_mods};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn touch(dir: &std::path::Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), "").unwrap();
    }
}

fn dir_listing(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// PatternMatcher
// =============================================================================

#[test]
fn test_compile_picks_variant() {
    assert!(matches!(
        PatternMatcher::compile("sodium").unwrap(),
        PatternMatcher::Exact(_)
    ));
    assert!(matches!(
        PatternMatcher::compile("sodium*").unwrap(),
        PatternMatcher::Prefix(_)
    ));
    assert!(matches!(
        PatternMatcher::compile("*sodium").unwrap(),
        PatternMatcher::Wildcard(_)
    ));
    assert!(matches!(
        PatternMatcher::compile("*").unwrap(),
        PatternMatcher::Wildcard(_)
    ));
    assert!(PatternMatcher::compile("  ").is_err());
}

#[test]
fn test_exact_requires_full_base_name() {
    let matcher = PatternMatcher::compile("Sodium").unwrap();
    assert!(matcher.matches("sodium"));
    assert!(!matcher.matches("sodium-extra"));

    let with_suffix = PatternMatcher::compile("sodium.jar").unwrap();
    assert!(with_suffix.matches("sodium"));
}

#[test]
fn test_prefix_and_wildcard_are_case_insensitive() {
    let prefix = PatternMatcher::compile("FOO*").unwrap();
    assert!(prefix.matches("foo-1.0"));
    assert!(!prefix.matches("barfoo"));

    let wildcard = PatternMatcher::compile("*Iris*").unwrap();
    assert!(wildcard.matches("oculus-iris-1.2"));
    assert!(wildcard.matches("IRIS"));
    assert!(!wildcard.matches("sodium"));
}

#[test]
fn test_wildcard_escapes_regex_metacharacters() {
    let matcher = PatternMatcher::compile("*mod(1.0)+*").unwrap();
    assert!(matcher.matches("xmod(1.0)+beta"));
    assert!(!matcher.matches("mod11.00beta"));

    let inner = PatternMatcher::compile("a*.b*").unwrap();
    assert!(inner.matches("axx.byy"));
    assert!(!inner.matches("axxbyy"));
}

#[test]
fn test_wildcard_matches_disabled_suffix_form() {
    let matcher = PatternMatcher::compile("*.jar.disabled").unwrap();
    assert!(matcher.matches("anything"));
}

#[test]
fn test_substring_wraps_plain_entries() {
    let matcher = PatternMatcher::substring("entityculling").unwrap();
    assert!(matcher.matches("EntityCulling-neoforge-1.7"));
    assert!(!matcher.matches("culling"));

    let explicit = PatternMatcher::substring("iris*").unwrap();
    assert!(matches!(explicit, PatternMatcher::Prefix(_)));
}

// =============================================================================
// ModFile and listing
// =============================================================================

#[test]
fn test_mod_file_classification() {
    let dir = std::path::Path::new("mods");

    let enabled = ModFile::from_file_name(dir, "foo-1.0.jar").unwrap();
    assert_eq!(enabled.base_name(), "foo-1.0");
    assert_eq!(enabled.state(), ModState::Enabled);

    let disabled = ModFile::from_file_name(dir, "foo-1.0.jar.disabled").unwrap();
    assert_eq!(disabled.base_name(), "foo-1.0");
    assert_eq!(disabled.state(), ModState::Disabled);
    assert_eq!(disabled.file_name_for(ModState::Enabled), "foo-1.0.jar");

    assert!(ModFile::from_file_name(dir, "notes.txt").is_none());
    assert!(ModFile::from_file_name(dir, "foo.zip.disabled").is_none());
    assert!(ModFile::from_file_name(dir, ".jar").is_none());
}

#[test]
fn test_list_mods_sorted_and_filtered() {
    let temp = temp_dir();
    let mods = temp.path().join("mods");
    touch(&mods, &["b.jar", "a.jar.disabled", "readme.md"]);
    std::fs::create_dir_all(mods.join("sub.jar")).unwrap();

    let listed: Vec<String> = list_mods(&mods)
        .unwrap()
        .iter()
        .map(ModFile::file_name)
        .collect();
    assert_eq!(listed, vec!["a.jar.disabled", "b.jar"]);

    assert!(list_mods(&temp.path().join("absent")).unwrap().is_empty());
}

// =============================================================================
// Toggling
// =============================================================================

#[test]
fn test_disable_with_prefix_pattern_then_reapply() {
    let temp = temp_dir();
    let mods = temp.path().join("mods");
    touch(&mods, &["foo-1.0.jar"]);

    let patterns = vec![(PatternMatcher::compile("foo*").unwrap(), ModState::Disabled)];

    let mut files = list_mods(&mods).unwrap();
    let first = apply(&patterns, &mut files);
    assert_eq!(first.disabled, vec!["foo-1.0.jar.disabled"]);
    assert_eq!(dir_listing(&mods), vec!["foo-1.0.jar.disabled"]);

    let mut files = list_mods(&mods).unwrap();
    let second = apply(&patterns, &mut files);
    assert_eq!(second.changed(), 0);
    assert_eq!(second.unchanged, 1);
    assert_eq!(dir_listing(&mods), vec!["foo-1.0.jar.disabled"]);
}

#[test]
fn test_enable_already_enabled_is_noop() {
    let temp = temp_dir();
    let mods = temp.path().join("mods");
    touch(&mods, &["bar.jar", "baz.jar.disabled"]);

    let patterns = vec![(PatternMatcher::compile("ba*").unwrap(), ModState::Enabled)];
    let mut files = list_mods(&mods).unwrap();
    let changes = apply(&patterns, &mut files);

    assert_eq!(changes.enabled, vec!["baz.jar"]);
    assert_eq!(changes.unchanged, 1);
    assert_eq!(dir_listing(&mods), vec!["bar.jar", "baz.jar"]);
}

#[test]
fn test_rename_failure_does_not_stop_other_files() {
    let temp = temp_dir();
    let mods = temp.path().join("mods");
    // Both variants exist: disabling "dup" collides.
    touch(&mods, &["dup.jar", "dup.jar.disabled", "other.jar"]);

    let patterns = vec![(PatternMatcher::compile("*").unwrap(), ModState::Disabled)];
    let mut files = list_mods(&mods).unwrap();
    let changes = apply(&patterns, &mut files);

    assert_eq!(changes.failures.len(), 1);
    assert_eq!(changes.failures[0].0, "dup.jar");
    assert_eq!(changes.disabled, vec!["other.jar.disabled"]);
    assert_eq!(changes.unchanged, 1);
}

#[test]
fn test_later_patterns_see_earlier_renames() {
    let temp = temp_dir();
    let mods = temp.path().join("mods");
    touch(&mods, &["iris-1.8.jar"]);

    let patterns = vec![
        (PatternMatcher::compile("*iris*").unwrap(), ModState::Disabled),
        (PatternMatcher::compile("iris-1.8").unwrap(), ModState::Enabled),
    ];
    let mut files = list_mods(&mods).unwrap();
    let changes = apply(&patterns, &mut files);

    assert_eq!(changes.disabled, vec!["iris-1.8.jar.disabled"]);
    assert_eq!(changes.enabled, vec!["iris-1.8.jar"]);
    assert_eq!(dir_listing(&mods), vec!["iris-1.8.jar"]);
}

// =============================================================================
// Optional mods
// =============================================================================

#[test]
fn test_optional_list_parse() {
    let (list, rejects) = OptionalMods::parse(&[
        "Distant Horizons:DistantHorizons*",
        "no separator",
        "Shaders: *iris* ",
        ":orphan",
    ]);

    insta::assert_debug_snapshot!(list.entries(), @r#"
    [
        OptionalMod {
            name: "Distant Horizons",
            pattern: "DistantHorizons*",
        },
        OptionalMod {
            name: "Shaders",
            pattern: "*iris*",
        },
    ]
    "#);
    assert_eq!(rejects, vec!["no separator", ":orphan"]);
}

#[test]
fn test_resolve_selections_by_display_name() {
    let (list, _) = OptionalMods::parse(&["Distant Horizons:DistantHorizons*"]);
    let mut selections = BTreeMap::new();
    selections.insert("distant horizons".to_string(), false);
    selections.insert("Unknown".to_string(), true);

    let resolved = resolve(Some(&list), &selections);

    assert_eq!(resolved.patterns.len(), 1);
    assert_eq!(resolved.patterns[0].1, ModState::Disabled);
    assert!(resolved.patterns[0].0.matches("DistantHorizons-2.3"));
    assert_eq!(resolved.warnings, vec!["unknown optional mod 'Unknown'"]);
}

#[test]
fn test_resolve_raw_patterns_without_list() {
    let mut selections = BTreeMap::new();
    selections.insert("sodium*".to_string(), true);

    let resolved = resolve(None, &selections);

    assert!(resolved.warnings.is_empty());
    assert_eq!(resolved.patterns[0].1, ModState::Enabled);
    assert!(resolved.patterns[0].0.matches("sodium-0.6"));
}
