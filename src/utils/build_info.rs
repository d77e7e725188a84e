//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `jigsweeper <date> (<commit>)`, as printed by `--version`.
pub fn version_line() -> String {
    format!("jigsweeper {} ({})", BUILD_DATE, BUILD_COMMIT)
}
