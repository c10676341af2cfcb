//! Compile-time build stamp, printed by `simulate --version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string, e.g. `forge 0.1.0 (a1b2c3d, 2026-10-19)`.
pub fn version_line() -> String {
    format!(
        "forge {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}
