use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let version_string = match git_short_hash() {
        Some(hash) if !points_at_release_tag(version) => {
            let built = Utc::now().format("%Y%m%d");
            format!("{version}+{hash}.{built}")
        }
        _ => version.to_owned(),
    };

    println!("cargo:rustc-env=CARGO_CONVER_VERSION={version_string}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_owned())
}

fn git_short_hash() -> Option<String> {
    git(&["rev-parse", "--short", "HEAD"])
}

fn points_at_release_tag(version: &str) -> bool {
    let expected = format!("cargo-conver@v{version}");
    git(&["tag", "--points-at", "HEAD"]).is_some_and(|tags| tags.lines().any(|t| t.trim() == expected))
}
