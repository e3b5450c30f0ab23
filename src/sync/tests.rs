// packsync: modpack instance synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::types::ProfileConfig;
use crate::git::fake::FakeGit;
use crate::git::reset::ResetStrategy;
use crate::net::ListSource;
use crate::snapshot::diff::{ChangeSet, Update};

const REMOTE: &str = "https://example.invalid/pack.git";

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Defaults with every network list switched off.
fn offline_config() -> Config {
    let mut config = Config::default();
    config.remote.url = REMOTE.to_string();
    config.lists.downloads = None;
    for profile in config.profiles.values_mut() {
        profile.disable_list = None;
    }
    config
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

// =============================================================================
// SyncState / Session
// =============================================================================

#[test]
fn test_state_transitions() {
    use SyncState::*;

    assert!(Idle.can_advance_to(RepositoryReady));
    assert!(RepositoryReady.can_advance_to(Reset));
    assert!(Reported.can_advance_to(Done));
    assert!(!Idle.can_advance_to(Reset));
    assert!(!Restored.can_advance_to(Reset));

    for state in [Idle, Reset, ModsToggled, Reported] {
        assert!(state.can_advance_to(Failed), "{state} -> failed");
    }
    assert!(!Done.can_advance_to(Failed));
    assert!(!Failed.can_advance_to(Failed));
    assert!(!Done.can_advance_to(Idle));
}

#[test]
fn test_session_rejects_skipped_state() {
    let mut session = Session::new(EventSink::none());
    session.advance(SyncState::RepositoryReady).unwrap();

    let err = session.advance(SyncState::Restored).unwrap_err();
    assert!(err.to_string().contains("repository_ready -> restored"));
    assert_eq!(session.state(), SyncState::RepositoryReady);
}

#[test]
fn test_failed_after_snapshot_is_a_warning() {
    let mut session = Session::new(EventSink::none());
    let err = FsError::io(
        Path::new("mods"),
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );

    let snapshot = snapshot_or_warn(Err(err.into()), &mut session);

    assert_eq!(snapshot, FileSnapshot::default());
    assert_eq!(session.warnings().len(), 1);
    assert!(session.warnings()[0].contains("denied"), "{:?}", session.warnings());
}

#[test]
fn test_session_events_and_warnings() {
    let (sink, rx) = EventSink::channel();
    let mut session = Session::new(sink);

    session.advance(SyncState::RepositoryReady).unwrap();
    session.progress(120, "almost");
    session.warn("list unavailable");
    session.fail();
    session.fail();

    assert_eq!(session.warnings(), ["list unavailable"]);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![
            SyncEvent::StateChanged(SyncState::RepositoryReady),
            SyncEvent::Progress {
                percent: 100,
                message: "almost".to_string()
            },
            SyncEvent::Warning("list unavailable".to_string()),
            SyncEvent::StateChanged(SyncState::Failed),
        ]
    );
}

#[test]
fn test_dropped_receiver_is_ignored() {
    let (sink, rx) = EventSink::channel();
    drop(rx);
    sink.emit(SyncEvent::Info("nobody listens".to_string()));
    EventSink::none().progress(5, "nor here");
}

// =============================================================================
// SyncReport
// =============================================================================

#[test]
fn test_report_render() {
    let report = SyncReport {
        state: SyncState::Done,
        reset_via: ResetStrategy::Checkout {
            target: "origin/main".to_string(),
        },
        changes: ChangeSet {
            added: vec!["mods/c.jar".to_string()],
            removed: vec!["resourcepacks/old.zip".to_string()],
            updated: vec![Update {
                from: "mods/a-1.0.jar".to_string(),
                to: "mods/a-2.0.jar".to_string(),
            }],
        },
        mods: AppliedChanges {
            disabled: vec!["heavy.jar.disabled".to_string()],
            unchanged: 2,
            ..AppliedChanges::default()
        },
        downloads: 1,
        warnings: vec!["shader preset potato/iris.properties not found".to_string()],
    };

    insta::assert_snapshot!(report.render(), @r"
    reset via checkout origin/main
    changes: 1 added, 1 removed, 1 updated
    + mods/c.jar
    - resourcepacks/old.zip
    ~ mods/a-1.0.jar -> mods/a-2.0.jar
    mods: 0 enabled, 1 disabled, 2 unchanged
    downloads: 1
    warning: shader preset potato/iris.properties not found
    ");
}

#[test]
fn test_report_json_shape() {
    let report = SyncReport {
        state: SyncState::Done,
        reset_via: ResetStrategy::Checkout {
            target: "origin/master".to_string(),
        },
        changes: ChangeSet::default(),
        mods: AppliedChanges::default(),
        downloads: 0,
        warnings: Vec::new(),
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["state"], "done");
    assert_eq!(json["reset_via"]["kind"], "checkout");
    assert_eq!(json["reset_via"]["target"], "origin/master");
    assert_eq!(json["changes"]["updated"], serde_json::json!([]));
}

// =============================================================================
// SyncOrchestrator
// =============================================================================

#[tokio::test]
async fn test_sync_resets_tree_and_preserves_user_state() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "options.txt", "key_forward:w\nfov:90\n");
    write(root, "mods/old-1.0.jar", "old");
    write(root, "mods/keep.jar.disabled", "mine");
    write(root, "saves/world.dat", "world");

    let git = FakeGit::new()
        .with_file("options.txt", "key_forward:x\nfov:70\nkey_sneak:y\n")
        .with_file("mods/old-2.0.jar", "new")
        .with_file("mods/keep.jar", "remote copy")
        .with_file("mods/new.jar", "added");
    let config = offline_config();

    let report = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).build())
        .await
        .unwrap();

    assert_eq!(report.state, SyncState::Done);
    assert_eq!(report.reset_via.to_string(), "checkout origin/main");
    assert_eq!(
        git.calls(),
        vec![
            "init".to_string(),
            format!("add_remote origin {REMOTE}"),
            "fetch origin main".to_string(),
            "fetch origin master".to_string(),
            "checkout origin/main".to_string(),
        ]
    );

    assert_eq!(read(root, "options.txt"), "key_forward:w\nfov:70\nkey_sneak:y\n");
    assert!(!root.join("mods/old-1.0.jar").exists());
    assert_eq!(read(root, "mods/keep.jar.disabled"), "mine");
    assert!(!root.join("mods/keep.jar").exists());
    assert_eq!(read(root, "saves/world.dat"), "world");
    assert!(read(root, ".gitignore").contains("!mods/**"));

    assert_eq!(report.changes.added, vec!["mods/new.jar"]);
    assert!(report.changes.removed.is_empty());
    assert_eq!(
        report.changes.updated,
        vec![Update {
            from: "mods/old-1.0.jar".to_string(),
            to: "mods/old-2.0.jar".to_string(),
        }]
    );
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[tokio::test]
async fn test_sync_keybinds_takes_remote_values() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "options.txt", "key_forward:w\nfov:90\n");

    let git = FakeGit::new().with_file("options.txt", "key_forward:x\nfov:70\n");
    let config = offline_config();

    SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).with_sync_keybinds(true).build())
        .await
        .unwrap();

    assert_eq!(read(root, "options.txt"), "key_forward:x\nfov:70\n");
}

#[tokio::test]
async fn test_existing_repository_gets_remote_url_updated() {
    let temp = temp_dir();
    let git = FakeGit::new();
    git.repo.set(true);
    *git.remote.borrow_mut() = Some("https://old.invalid/pack.git".to_string());
    let config = offline_config();

    SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(temp.path()).build())
        .await
        .unwrap();

    assert_eq!(git.calls()[0], format!("set_remote_url origin {REMOTE}"));
    assert!(!git.calls().contains(&"init".to_string()));
}

#[tokio::test]
async fn test_fetch_failure_is_fatal_before_clearing() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "mods/a.jar", "a");

    let git = FakeGit::new().failing("fetch");
    let config = offline_config();
    let (sink, rx) = EventSink::channel();

    let err = SyncOrchestrator::new(&config, &git)
        .with_events(sink)
        .run(&SyncRequest::builder().with_instance(root).build())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed to fetch from origin"));
    assert!(root.join("mods/a.jar").exists());
    let states: Vec<SyncState> = rx
        .try_iter()
        .filter_map(|event| match event {
            SyncEvent::StateChanged(state) => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![SyncState::RepositoryReady, SyncState::Failed]);
}

#[tokio::test]
async fn test_plain_fetch_rescues_failed_branch_fetches() {
    let temp = temp_dir();
    let git = FakeGit::new().failing("fetch origin m");
    let config = offline_config();

    SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(temp.path()).build())
        .await
        .unwrap();

    assert!(git.calls().contains(&"fetch origin".to_string()));
}

#[tokio::test]
async fn test_reset_exhaustion_is_fatal() {
    let temp = temp_dir();
    let git = FakeGit::new().failing("checkout").failing("ls_remote");
    let config = offline_config();

    let err = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(temp.path()).build())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("could not reset working copy"));
}

#[tokio::test]
async fn test_unknown_profile_fails_before_any_git_call() {
    let temp = temp_dir();
    let git = FakeGit::new();
    let config = offline_config();

    let err = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(temp.path()).with_profile("nope").build())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("unknown profile 'nope'"));
    assert!(git.calls().is_empty());
}

#[tokio::test]
async fn test_profile_merge_and_disable_list() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "options.txt", "key_jump:space\nfov:90\n");

    let git = FakeGit::new()
        .with_file("options.txt", "key_jump:ctrl\nfov:70\n")
        .with_file("potato/potato.txt", "key_jump:alt\nfov:110\nrenderDistance:4\n")
        .with_file("potato/sodium.json", "{}")
        .with_file("potato/disabled.txt", "heavy\n\n")
        .with_file("mods/HeavyShaders-1.0.jar", "h")
        .with_file("mods/light.jar", "l");
    let mut config = offline_config();
    config.profiles.insert(
        "potato".to_string(),
        ProfileConfig {
            dir: "potato".to_string(),
            settings_file: "potato.txt".to_string(),
            disable_list: Some(ListSource::from("potato/disabled.txt")),
        },
    );

    let report = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).with_profile("potato").build())
        .await
        .unwrap();

    assert_eq!(
        read(root, "options.txt"),
        "key_jump:space\nfov:110\nrenderDistance:4\n"
    );
    assert_eq!(read(root, "config/sodium.json"), "{}");
    assert!(!root.join("config/potato.txt").exists());
    assert_eq!(report.mods.disabled, vec!["HeavyShaders-1.0.jar.disabled"]);
    assert!(root.join("mods/HeavyShaders-1.0.jar.disabled").exists());
    assert!(root.join("mods/light.jar").exists());
}

#[tokio::test]
async fn test_profile_does_not_override_preserved_keys() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "options.txt", "key_jump:space\nfov:90\n");

    let git = FakeGit::new()
        .with_file("options.txt", "key_jump:ctrl\nfov:70\n")
        .with_file("potato/potato.txt", "fov:110\nrenderDistance:4\n");
    let mut config = offline_config();
    config.settings.preserve_keys = vec!["fov".to_string()];
    config.profiles.insert(
        "potato".to_string(),
        ProfileConfig {
            dir: "potato".to_string(),
            settings_file: "potato.txt".to_string(),
            disable_list: None,
        },
    );

    SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).with_profile("potato").build())
        .await
        .unwrap();

    assert_eq!(
        read(root, "options.txt"),
        "key_jump:space\nfov:90\nrenderDistance:4\n"
    );
}

#[tokio::test]
async fn test_missing_profile_settings_is_a_warning() {
    let temp = temp_dir();
    let git = FakeGit::new().with_file("mods/a.jar", "a");
    let config = offline_config();

    let report = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(temp.path()).with_profile("potato").build())
        .await
        .unwrap();

    assert_eq!(report.state, SyncState::Done);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("potato.txt not found"));
}

#[tokio::test]
async fn test_shader_dont_sync_keeps_user_file() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "config/iris.properties", "shaderPack=mine");

    let git = FakeGit::new().with_file("config/iris.properties", "shaderPack=remote");
    let config = offline_config();

    SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).with_shaders(ShaderPreset::DontSync).build())
        .await
        .unwrap();

    assert_eq!(read(root, "config/iris.properties"), "shaderPack=mine");
}

#[tokio::test]
async fn test_shader_off_copies_preset_and_missing_alternate_warns() {
    let temp = temp_dir();
    let root = temp.path();

    let git = FakeGit::new()
        .with_file("config/iris.properties", "enableShaders=true")
        .with_file("potato/iris.properties", "enableShaders=false");
    let config = offline_config();
    let orchestrator = SyncOrchestrator::new(&config, &git);

    orchestrator
        .run(&SyncRequest::builder().with_instance(root).with_shaders(ShaderPreset::Off).build())
        .await
        .unwrap();
    assert_eq!(read(root, "config/iris.properties"), "enableShaders=false");

    let report = orchestrator
        .run(&SyncRequest::builder().with_instance(root).with_shaders(ShaderPreset::Alternate).build())
        .await
        .unwrap();
    assert_eq!(read(root, "config/iris.properties"), "enableShaders=true");
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("iris-alternate.properties not found"));
}

#[tokio::test]
async fn test_selections_resolve_through_optional_list() {
    let temp = temp_dir();
    let root = temp.path();
    write(root, "optional.txt", "Distant Horizons:DistantHorizons*\nbroken line\n");

    let git = FakeGit::new()
        .with_file("mods/DistantHorizons-2.0.jar", "dh")
        .with_file("mods/other.jar", "o");
    let mut config = offline_config();
    config.lists.optional_mods = Some(ListSource::from("optional.txt"));

    let mut selections = BTreeMap::new();
    selections.insert("distant horizons".to_string(), false);
    selections.insert("Unknown".to_string(), true);

    let report = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).with_mod_selections(selections).build())
        .await
        .unwrap();

    assert!(root.join("mods/DistantHorizons-2.0.jar.disabled").exists());
    assert!(root.join("mods/other.jar").exists());
    assert_eq!(report.mods.disabled.len(), 1);
    assert_eq!(
        report.warnings,
        vec![
            "malformed optional mod line 'broken line'".to_string(),
            "unknown optional mod 'Unknown'".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_downloads_fetch_missing_artifacts_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/Big-1.0.jar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"big".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/Gone.jar"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = temp_dir();
    let root = temp.path();
    write(root, "mods/Skip.jar.disabled", "user disabled");
    write(
        root,
        "downloads.txt",
        &format!(
            "{0}/files/Big-1.0.jar\n{0}/files/Gone.jar\n{0}/files/Skip.jar\n",
            server.uri()
        ),
    );

    let git = FakeGit::new().with_file("mods/small.jar", "s");
    let mut config = offline_config();
    config.lists.downloads = Some(ListSource::from("downloads.txt"));
    let orchestrator = SyncOrchestrator::new(&config, &git);

    let first = orchestrator.run(&SyncRequest::builder().with_instance(root).build()).await.unwrap();
    assert_eq!(first.downloads, 1);
    assert_eq!(read(root, "mods/Big-1.0.jar"), "big");
    assert_eq!(first.warnings.len(), 1);
    assert!(first.warnings[0].contains("Gone.jar"));
    assert!(read(root, ".gitignore").contains("mods/Big-1.0.jar\n"));

    // The artifact survives the next clear and is not downloaded again.
    let second = orchestrator.run(&SyncRequest::builder().with_instance(root).build()).await.unwrap();
    assert_eq!(second.downloads, 0);
    assert!(root.join("mods/Big-1.0.jar").exists());

    let skipped = orchestrator
        .run(&SyncRequest::builder().with_instance(root).with_downloads(false).build())
        .await
        .unwrap();
    assert!(skipped.warnings.is_empty());
}

#[tokio::test]
async fn test_unreachable_download_list_falls_back_to_excluded_file() {
    let temp = temp_dir();
    let root = temp.path();
    let git = FakeGit::new();
    let mut config = offline_config();
    config.lists.downloads = Some(ListSource::from("missing-list.txt"));

    let report = SyncOrchestrator::new(&config, &git)
        .run(&SyncRequest::builder().with_instance(root).build())
        .await
        .unwrap();

    assert!(report.warnings[0].contains("download list unavailable"));
    assert!(read(root, ".gitignore").ends_with("mods/Cobblemon-neoforge-1.6.1+1.21.1.jar\n"));
}
