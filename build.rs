// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

/// Exposes `GIT_VERSION` as `<crate version>+<short hash>`, or the value
/// of `QRSCAN_VERSION` when packagers set it.
fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=QRSCAN_VERSION");

    let version = std::env::var("QRSCAN_VERSION").unwrap_or_else(|_| {
        let base = env!("CARGO_PKG_VERSION");
        match commit_hash() {
            Some(hash) => format!("{base}+{hash}"),
            None => base.to_string(),
        }
    });

    println!("cargo::rustc-env=GIT_VERSION={version}");
}

fn commit_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
