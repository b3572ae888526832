//! End-to-end sync scenarios
//!
//! Each scenario goes through the same path as the binary: layered
//! configuration, validation, then the SyncEngine, with the network replaced
//! by a scripted transport.

use std::fs;

use gfd_core::{
    ConfigResolver, Error, Mode, Outcome, RawSettings, Settings, SyncEngine, SyncOptions,
    SyncReport, WriteReason,
};
use gfd_test_utils::fixtures::{
    SETTINGS_JSON_BASE64, SETTINGS_JSON_SHA256, raw_file_envelope, settings_json_bytes,
};
use gfd_test_utils::{FakeTransport, TestWorkspace};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Resolve settings the way the CLI does, with the global layer pointed at
/// an empty directory.
fn resolve(overrides: RawSettings) -> Result<Settings, Error> {
    let global = TempDir::new().unwrap();
    let raw = ConfigResolver::new()
        .with_global_config_dir(global.path())
        .resolve(&overrides)?;
    Ok(raw.validate()?)
}

fn credentials() -> RawSettings {
    RawSettings {
        token: Some("glpat-scenario".into()),
        url: Some("https://gitlab.com/api/v4/".into()),
        project: Some("16447351".into()),
        ..Default::default()
    }
}

fn sync(transport: &FakeTransport, settings: &Settings) -> Result<SyncReport, Error> {
    SyncEngine::new(transport, SyncOptions::default()).run(settings)
}

// =============================================================================
// File mode
// =============================================================================

#[test]
fn scenario_settings_json_download_then_skip() {
    let ws = TestWorkspace::new();
    let transport = FakeTransport::new();
    transport.serve_file_record(
        "settings.json",
        raw_file_envelope("settings.json", SETTINGS_JSON_BASE64, SETTINGS_JSON_SHA256),
    );
    let settings = resolve(RawSettings {
        repo_file_path: Some("settings.json".into()),
        out_path: Some(ws.path("settings.json")),
        ..credentials()
    })
    .unwrap();

    let first = sync(&transport, &settings).unwrap();
    assert_eq!(
        first.items[0].outcome,
        Outcome::Wrote {
            reason: WriteReason::New
        }
    );
    ws.assert_file_content("settings.json", &settings_json_bytes());
    assert_eq!(
        gfd_fs::digest_bytes(&ws.read("settings.json")),
        SETTINGS_JSON_SHA256
    );

    let second = sync(&transport, &settings).unwrap();
    assert_eq!(second.items[0].outcome, Outcome::Skipped);

    let urls = transport.urls();
    assert_eq!(urls.len(), 2);
    assert_eq!(
        urls[0],
        "https://gitlab.com/api/v4/projects/16447351/repository/files/settings.json?ref=master"
    );
    assert!(
        transport.calls()[0]
            .user_agent
            .starts_with("gitlab-file-downloader/")
    );
}

#[test]
fn scenario_local_edit_is_overwritten() {
    let ws = TestWorkspace::new();
    ws.write("settings.json", b"{\"fruit\": \"Banana\"}\n");
    let transport = FakeTransport::new();
    transport.serve_file("settings.json", &settings_json_bytes());
    let settings = resolve(RawSettings {
        repo_file_path: Some("settings.json".into()),
        out_path: Some(ws.path("settings.json")),
        ..credentials()
    })
    .unwrap();

    let report = sync(&transport, &settings).unwrap();

    assert_eq!(
        report.items[0].outcome,
        Outcome::Wrote {
            reason: WriteReason::Changed
        }
    );
    ws.assert_file_content("settings.json", &settings_json_bytes());
}

#[test]
fn scenario_branch_from_config_file_reaches_the_request() {
    let ws = TestWorkspace::new();
    let config = ws.write(
        "downloader.toml",
        br#"
branch = "release/2.0"
repoFilePath = "conf/app.toml"
"#,
    );
    let transport = FakeTransport::new();
    transport.serve_file("conf/app.toml", b"key = 1\n");

    let global = TempDir::new().unwrap();
    let settings = ConfigResolver::new()
        .with_global_config_dir(global.path())
        .with_config_file(config)
        .resolve(&RawSettings {
            out_path: Some(ws.path("app.toml")),
            ..credentials()
        })
        .unwrap()
        .validate()
        .unwrap();

    sync(&transport, &settings).unwrap();

    assert!(
        transport.urls()[0].ends_with("/files/conf%2Fapp.toml?ref=release%2F2.0"),
        "got: {}",
        transport.urls()[0]
    );
    ws.assert_file_content("app.toml", b"key = 1\n");
}

// =============================================================================
// Folder mode
// =============================================================================

#[test]
fn scenario_folder_with_one_bad_item() {
    let ws = TestWorkspace::new();
    let transport = FakeTransport::new();
    transport
        .serve_tree(
            "config",
            &[
                ("config/a.json", "blob"),
                ("config/b.json", "blob"),
                ("config/templates", "tree"),
                ("config/c.json", "blob"),
            ],
        )
        .serve_file("config/a.json", b"{\"a\":1}")
        .serve_file_record(
            "config/b.json",
            raw_file_envelope("config/b.json", "not*base64", "00"),
        )
        .serve_file("config/c.json", b"{\"c\":3}");
    let settings = resolve(RawSettings {
        repo_folder: Some("config".into()),
        out_folder: Some(ws.path("config")),
        ..credentials()
    })
    .unwrap();

    let report = sync(&transport, &settings).unwrap();

    assert_eq!(report.mode, Mode::Folder);
    assert_eq!(report.written(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.items[2].outcome, Outcome::SkippedNotAFile);
    assert_eq!(ws.list("config"), vec!["a.json", "c.json"]);

    // Fixing the broken item only writes that one on the next run
    transport.serve_file("config/b.json", b"{\"b\":2}");
    let rerun = sync(&transport, &settings).unwrap();
    assert!(rerun.success());
    assert_eq!(rerun.written(), 1);
    assert_eq!(ws.list("config"), vec!["a.json", "b.json", "c.json"]);
}

#[test]
fn scenario_report_serializes_for_scripting() {
    let ws = TestWorkspace::new();
    let transport = FakeTransport::new();
    transport
        .serve_tree("d", &[("d/x.txt", "blob")])
        .serve_file("d/x.txt", b"x");
    let settings = resolve(RawSettings {
        repo_folder: Some("d".into()),
        out_folder: Some(ws.path("out")),
        ..credentials()
    })
    .unwrap();

    let report = sync(&transport, &settings).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["mode"], "folder");
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["items"][0]["remote_path"], "d/x.txt");
    assert_eq!(json["items"][0]["status"], "wrote");
    assert_eq!(json["items"][0]["reason"], "new");
}

// =============================================================================
// Configuration errors
// =============================================================================

#[test]
fn scenario_conflicting_targets_make_no_requests() {
    let ws = TestWorkspace::new();
    let transport = FakeTransport::new();

    let err = resolve(RawSettings {
        repo_file_path: Some("settings.json".into()),
        out_path: Some(ws.path("settings.json")),
        repo_folder: Some("config".into()),
        out_folder: Some(ws.path("config")),
        ..credentials()
    })
    .unwrap_err();

    match err {
        Error::Config(config) => {
            let message = config.to_string();
            assert!(message.contains("outPath"), "got: {}", message);
            assert!(message.contains("outFolder"), "got: {}", message);
        }
        other => panic!("expected Config error, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 0);
    assert!(fs::read_dir(ws.root()).unwrap().next().is_none());
}
