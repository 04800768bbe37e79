//! crossverify version information.
//!
//! Exposed as a single constant so the CLI and generated harness headers agree on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The crossverify version string (for example, `0.1.0`).
pub const CROSSVERIFY_VERSION: &str = env!("CARGO_PKG_VERSION");
