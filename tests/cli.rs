use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Runner binary with an empty PATH so neither `autopkg` nor `defaults` resolve
fn runner(empty_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("autopkg-runner").expect("Binary exists");
    cmd.env("PATH", empty_path).env("NO_COLOR", "1");
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, contents).expect("Writing temp config failed");
    path
}

#[test]
fn help_lists_flags() {
    let dir = TempDir::new().unwrap();
    runner(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--upload").and(predicate::str::contains("--config")));
}

#[test]
fn missing_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    runner(dir.path())
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Config file not found"));
}

#[test]
fn malformed_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "recipes: [unterminated\n");

    runner(dir.path())
        .arg("--config")
        .arg(config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error parsing YAML config"));
}

#[test]
fn default_mode_warns_about_repo_path_and_still_runs_recipe() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "repo_path: /nonexistent\nrecipes:\n  - Firefox.munki\n",
    );

    runner(dir.path())
        .arg("--config")
        .arg(config)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("MUNKI_REPO path does not exist: /nonexistent")
                .and(predicate::str::contains("Running recipe: Firefox.munki"))
                .and(predicate::str::contains("Recipe 'Firefox.munki' failed")),
        );
}

#[test]
fn upload_without_password_exits_before_connecting() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("munki_repo")).unwrap();
    let config = write_config(
        &dir,
        &format!(
            "repo_path: {}\nsftp_host: 192.0.2.1\nsftp_user: munki\n",
            dir.path().join("munki_repo").display()
        ),
    );

    runner(dir.path())
        .arg("--upload")
        .arg("--config")
        .arg(config)
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("Missing SFTP configuration")
                .and(predicate::str::contains("sftp_password"))
                .and(predicate::str::contains("Connecting to SFTP server").not()),
        );
}

#[test]
fn upload_with_missing_repo_path_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "repo_path: /nonexistent/munki_repo\nsftp_host: 192.0.2.1\nsftp_user: munki\nsftp_password: secret\n",
    );

    runner(dir.path())
        .arg("--upload")
        .arg("--config")
        .arg(config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Repository path does not exist"));
}
