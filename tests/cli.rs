//! Command line behavior against temporary projects.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CONFIG: &str = r#"
[project]
game = "Grib"
organization = "pierotechnical"
"#;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("publish.toml"), CONFIG).unwrap();
    dir
}

fn cmd(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("publish_matrix").unwrap();
    cmd.arg("-C")
        .arg(project)
        .env("PUBLISH_MATRIX_PREFS", project.join("prefs.json"))
        .env_remove("BUTLER_PATH")
        .env_remove("RUST_LOG");
    cmd
}

fn version_path(project: &Path) -> std::path::PathBuf {
    project.join("Assets").join("version.txt")
}

fn write_version(project: &Path, text: &str) {
    std::fs::create_dir_all(project.join("Assets")).unwrap();
    std::fs::write(version_path(project), text).unwrap();
}

fn read_version(project: &Path) -> String {
    std::fs::read_to_string(version_path(project)).unwrap()
}

#[test]
fn version_show_creates_default() {
    let dir = project();
    cmd(dir.path())
        .args(["version", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
    assert_eq!(read_version(dir.path()), "0.1.0");
}

#[test]
fn bump_minor_resets_patch() {
    let dir = project();
    write_version(dir.path(), "1.4.7\n");
    cmd(dir.path())
        .args(["version", "bump-minor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.4.7 -> 1.5.0"));
    assert_eq!(read_version(dir.path()), "1.5.0");
}

#[test]
fn bump_patch_rejects_malformed_version() {
    let dir = project();
    write_version(dir.path(), "1.x.3");
    cmd(dir.path())
        .args(["version", "bump-patch"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Version format is incorrect"));
    assert_eq!(read_version(dir.path()), "1.x.3");
}

#[test]
fn version_set_persists() {
    let dir = project();
    cmd(dir.path()).args(["version", "set", "2.0.0"]).assert().success();
    assert_eq!(read_version(dir.path()), "2.0.0");

    cmd(dir.path())
        .args(["version", "set", "2.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already 2.0.0"));
}

#[test]
fn targets_lists_platforms_and_game_page() {
    let dir = project();
    cmd(dir.path())
        .arg("targets")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Windows (native)"))
        .stdout(predicate::str::contains("[ ] WebGL (managed)"))
        .stdout(predicate::str::contains("pierotechnical/grib:linux"))
        .stdout(predicate::str::contains("https://pierotechnical.itch.io/grib"));
}

#[test]
fn prefs_round_trip_through_file() {
    let dir = project();
    cmd(dir.path())
        .args(["prefs", "set-butler", "/opt/butler/butler"])
        .assert()
        .success();
    cmd(dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ButlerPath = /opt/butler/butler"));
    cmd(dir.path())
        .args(["prefs", "clear-butler"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared ButlerPath"));
    cmd(dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No preferences stored"));
}

#[test]
fn build_with_nothing_selected_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("publish.toml"),
        format!("{CONFIG}\n[targets.windows]\nenabled = false\n"),
    )
    .unwrap();
    cmd(dir.path())
        .args(["build", "--no-prompt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No platforms selected"));
}

#[test]
fn missing_project_dir_fails() {
    Command::cargo_bin("publish_matrix")
        .unwrap()
        .args(["-C", "/definitely/not/a/project", "targets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
mod shell {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Config whose build program writes the requested output file.
    const SHELL_CONFIG: &str = r#"
[project]
game = "Grib"
organization = "pierotechnical"

[backend]
program = "sh"
args = ["-c", "echo game > \"$0\"", "{output}"]

[targets.windows]
enabled = false

[targets.linux]
enabled = true
variants = ["managed"]
"#;

    fn script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn shell_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("publish.toml"), SHELL_CONFIG).unwrap();
        write_version(dir.path(), "0.2.0");
        dir
    }

    #[test]
    fn build_packages_and_pushes() {
        let dir = shell_project();
        let butler = script(
            dir.path(),
            "butler",
            "echo \"$@\" > \"$(dirname \"$0\")/pushed.txt\"",
        );

        cmd(dir.path())
            .args(["build", "--no-prompt", "--butler"])
            .arg(&butler)
            .assert()
            .success()
            .stdout(predicate::str::contains("Linux uploaded"));

        let pushed = std::fs::read_to_string(dir.path().join("pushed.txt")).unwrap();
        assert!(pushed.starts_with("push "));
        assert!(pushed.contains("Grib_Linux.zip pierotechnical/grib:linux --userversion 0.2.0"));
        assert!(
            dir.path()
                .join("Builds/_versions/Grib_Linux_0.2.0.zip")
                .is_file()
        );
    }

    #[test]
    fn uploader_failure_exits_nonzero() {
        let dir = shell_project();
        let butler = script(dir.path(), "butler", "echo 'not logged in' >&2\nexit 3");

        cmd(dir.path())
            .args(["build", "--no-prompt", "--butler"])
            .arg(&butler)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Linux UploadFailed"))
            .stderr(predicate::str::contains("not logged in"));
    }

    #[test]
    fn unresolved_uploader_reports_config_error() {
        let dir = shell_project();
        cmd(dir.path())
            .args(["build", "--no-prompt"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("ConfigError"));
    }
}
