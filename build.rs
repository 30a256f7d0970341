//! Build script for persona-engine
//!
//! Embeds git commit, build timestamp, target, profile and rustc version.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let build_timestamp = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!(
        "cargo:rustc-env=PERSONA_ENGINE_GIT_HASH={}",
        run("git", &["rev-parse", "--short=8", "HEAD"])
    );
    println!("cargo:rustc-env=PERSONA_ENGINE_GIT_DIRTY={}", git_dirty());
    println!(
        "cargo:rustc-env=PERSONA_ENGINE_BUILD_TIMESTAMP={}",
        build_timestamp
    );
    println!("cargo:rustc-env=PERSONA_ENGINE_TARGET={}", target);
    println!("cargo:rustc-env=PERSONA_ENGINE_PROFILE={}", profile);
    println!(
        "cargo:rustc-env=PERSONA_ENGINE_RUSTC_VERSION={}",
        run("rustc", &["--version"])
    );
}

/// Trimmed stdout of a command, or "unknown"
fn run(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_dirty() -> &'static str {
    Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .map(|output| {
            if output.status.success() && !output.stdout.is_empty() {
                "true"
            } else {
                "false"
            }
        })
        .unwrap_or("unknown")
}
