//! Writes `BUILD_COMMIT` and `BUILD_DATE` into `$OUT_DIR/build_info.rs`.
//!
//! Release pipelines pin both values through `JIGSWEEPER_BUILD_COMMIT` and
//! `JIGSWEEPER_BUILD_DATE`; local builds ask git and the system clock.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const COMMIT_ENV: &str = "JIGSWEEPER_BUILD_COMMIT";
const DATE_ENV: &str = "JIGSWEEPER_BUILD_DATE";

fn commit_hash() -> String {
    if let Ok(pinned) = env::var(COMMIT_ENV) {
        return pinned;
    }
    let output = match Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => return "unknown".to_string(),
    };
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if hash.is_empty() {
        "unknown".to_string()
    } else {
        hash
    }
}

fn build_date() -> String {
    env::var(DATE_ENV).unwrap_or_else(|_| chrono::Utc::now().date_naive().to_string())
}

fn main() {
    let generated = format!(
        "pub const BUILD_COMMIT: &str = {:?};\npub const BUILD_DATE: &str = {:?};\n",
        commit_hash(),
        build_date()
    );

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("build_info.rs"), generated).expect("writing build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed={}", COMMIT_ENV);
    println!("cargo:rerun-if-env-changed={}", DATE_ENV);
}
