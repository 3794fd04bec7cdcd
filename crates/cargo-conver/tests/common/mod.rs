#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

macro_rules! cargo_conver {
    ($dir:expr) => {{
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cargo-conver");
        cmd.current_dir($dir)
            .env("CONVER_NO_TTY", "1")
            .env_remove("CONVER_LOG");
        cmd
    }};
}

pub(crate) use cargo_conver;

pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn init_git_repo(dir: &Path) {
    git(dir, &["init", "--initial-branch=main"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-m", message]);
}

pub fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("create dir");
    fs::write(path, content).expect("write file");
}

pub fn read(dir: &Path, relative: &str) -> String {
    fs::read_to_string(dir.join(relative)).expect("read file")
}

pub fn package_manifest(name: &str, version: &str) -> String {
    format!("[package]\nname = \"{name}\"\nversion = \"{version}\"\nedition = \"2021\"\n")
}

/// A committed repository containing the given files.
pub fn repo_with(files: &[(&str, String)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (path, content) in files {
        write(dir.path(), path, content);
    }
    init_git_repo(dir.path());
    commit_all(dir.path(), "chore: initial");
    dir
}

/// `crate-a` and `crate-b` at 1.2.3 in a virtual workspace, with `crate-b`
/// depending on `crate-a`.
pub fn two_crate_workspace() -> TempDir {
    repo_with(&[
        (
            "Cargo.toml",
            "[workspace]\nmembers = [\"crates/*\"]\nresolver = \"2\"\n".to_string(),
        ),
        ("crates/crate-a/Cargo.toml", package_manifest("crate-a", "1.2.3")),
        ("crates/crate-a/src/lib.rs", String::new()),
        (
            "crates/crate-b/Cargo.toml",
            format!(
                "{}\n[dependencies]\ncrate-a = {{ path = \"../crate-a\", version = \"1.2.3\" }}\n",
                package_manifest("crate-b", "1.2.3")
            ),
        ),
        ("crates/crate-b/src/lib.rs", String::new()),
    ])
}
