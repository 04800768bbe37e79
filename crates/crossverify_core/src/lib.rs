//! Provide the shared, pure vocabulary of the crossverify engine.
//!
//! This crate is intentionally small and dependency-light. It holds the facts that the syntax frontend, the
//! runner adapters, and the CLI must agree on:
//! - which languages exist and how they are spelled (`lang`),
//! - what the generated harnesses are called and how they signal misuse (`conventions`),
//! - which integer values the test-case generator seeds its structured cases with (`inputs`).
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, no process handling.
//! - `serde` support for [`lang::LanguageId`] is behind the optional `serde` feature.

pub mod conventions;
pub mod inputs;
pub mod lang;

pub use lang::languages::{LanguageId, REFERENCE_LANGUAGE};
