//! Build script: version string and the default deployment environment.
//!
//! Release builds talk to the production origin unless told otherwise, so
//! the default for `--env` follows the cargo profile. `BLOGDESK_BUILD_ENV`
//! set at build time overrides it.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=BLOGDESK_BUILD_ENV");

    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=BLOGDESK_VERSION={}", version);

    let profile = std::env::var("PROFILE").unwrap_or_default();
    let build_env = match std::env::var("BLOGDESK_BUILD_ENV") {
        Ok(value) => normalize_env(&value).unwrap_or_else(|| {
            println!("cargo:warning=ignoring unknown BLOGDESK_BUILD_ENV '{value}'");
            profile_env(&profile)
        }),
        Err(_) => profile_env(&profile),
    };
    println!("cargo:rustc-env=BLOGDESK_BUILD_ENV={}", build_env);
}

fn profile_env(profile: &str) -> &'static str {
    if profile == "release" {
        "production"
    } else {
        "development"
    }
}

/// Accepts the same spellings as `--env`.
fn normalize_env(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => Some("development"),
        "production" | "prod" => Some("production"),
        _ => None,
    }
}

/// `git describe` output without a leading `v`, if this is a git checkout.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let version = String::from_utf8(output.stdout).ok()?;
    let version = version.trim();
    if version.is_empty() {
        return None;
    }

    Some(version.strip_prefix('v').unwrap_or(version).to_string())
}
