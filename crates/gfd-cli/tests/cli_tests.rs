//! Integration tests for the gitlab-file-downloader binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "GFD_TOKEN",
    "GFD_URL",
    "GFD_PROJECT_NUMBER",
    "GFD_BRANCH",
    "GFD_CONFIG",
    "RUST_LOG",
];

/// Command with the environment isolated from the developer's own settings.
///
/// The returned `TempDir` is the global config home and must outlive the run.
fn gfd_cmd() -> (Command, TempDir) {
    let config_home = TempDir::new().unwrap();
    let mut cmd =
        Command::cargo_bin("gitlab-file-downloader").expect("Failed to find binary");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1");
    (cmd, config_home)
}

const CREDENTIALS: &[&str] = &[
    "--token",
    "glpat-test",
    "--url",
    "http://127.0.0.1:9/api/v4",
    "--project-number",
    "16447351",
];

#[test]
fn test_help_exits_zero() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--repo-file-path"))
        .stdout(predicate::str::contains("--out-folder"));
}

#[test]
fn test_version_flag() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_settings_lists_every_missing_field() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("token"))
        .stderr(predicate::str::contains("url"))
        .stderr(predicate::str::contains("projectNumber"))
        .stderr(predicate::str::contains("outPath"))
        .stderr(predicate::str::contains("repoFolder"))
        .stderr(predicate::str::contains("branch").not());
}

#[test]
fn test_file_and_folder_flags_conflict() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.args(CREDENTIALS)
        .args(["--out-path", "a.json", "--out-folder", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "outPath cannot be combined with outFolder",
        ));
}

#[test]
fn test_token_from_environment() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.env("GFD_TOKEN", "from-env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing url"))
        .stderr(predicate::str::contains("from-env").not());
}

#[test]
fn test_missing_output_directory_fails_without_network() {
    let work = TempDir::new().unwrap();
    let out = work.path().join("no-such-dir").join("settings.json");
    let (mut cmd, _home) = gfd_cmd();

    cmd.args(CREDENTIALS)
        .args(["--repo-file-path", "settings.json", "--out-path"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!out.exists());
}

#[test]
fn test_missing_config_file() {
    let (mut cmd, _home) = gfd_cmd();
    cmd.args(["--config", "/nonexistent/downloader.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_malformed_config_file() {
    let work = TempDir::new().unwrap();
    let config = work.path().join("downloader.toml");
    fs::write(&config, "token = \n").unwrap();
    let (mut cmd, _home) = gfd_cmd();

    cmd.arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration"));
}

#[test]
fn test_config_file_supplies_credentials() {
    let work = TempDir::new().unwrap();
    let config = work.path().join("downloader.toml");
    fs::write(
        &config,
        r#"
token = "glpat-file"
url = "https://gitlab.example.com/api/v4"
projectNumber = 16447351
"#,
    )
    .unwrap();
    let (mut cmd, _home) = gfd_cmd();

    cmd.arg("--config")
        .arg(&config)
        .args(["--repo-file-path", "settings.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing outPath"))
        .stderr(predicate::str::contains("token").not());
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_config_is_read() {
    let (mut cmd, home) = gfd_cmd();
    let global = home.path().join("gitlab-file-downloader");
    fs::create_dir_all(&global).unwrap();
    fs::write(
        global.join("config.toml"),
        "token = \"glpat-global\"\nurl = \"https://gitlab.example.com/api/v4\"\n",
    )
    .unwrap();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("projectNumber"))
        .stderr(predicate::str::contains("token").not());
}
