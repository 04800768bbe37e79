#![forbid(unsafe_code)]
//! crossverify: behavioural equivalence checking across languages.
//!
//! Given a reference implementation of a function (Python by default) and a candidate implementation in
//! another language, the engine infers the function's arity, generates edge-case and randomized integer
//! inputs, runs both implementations in isolated subprocesses behind generated harnesses, and reports how
//! many normalized outputs agree.
//!
//! ## Layout
//!
//! - [`executor`]: run one external command under a wall-clock timeout.
//! - [`harness`]: render per-language harness sources around user code.
//! - [`runners`]: prepare (write + build) and invoke harnesses per language.
//! - [`arity`]: infer a function's parameter count from its source.
//! - [`testgen`]: structured, random and custom test cases.
//! - [`compare`]: output normalization and the pass/fail [`compare::Report`].
//! - [`verify`]: the end-to-end [`verify::Verifier`].
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli`, `executor`,
//!   `runners` and `verify` modules enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Generated code**: harness templates contain target-language error handling as *string literals*; none
//!   of it runs inside this process.
//!
//! ## Limitations
//!
//! This is a black-box, finite-sample check, not a proof of equivalence. Subprocesses are isolated only by
//! a fresh working directory and a wall-clock timeout; there is no resource, memory or network sandbox.

pub mod arity;
pub mod cli;
pub mod compare;
pub mod config;
pub mod executor;
pub mod harness;
pub mod runners;
pub mod sanitize;
pub mod testgen;
pub mod verify;
pub mod version;

pub use arity::{ArityError, infer_arity, infer_arity_or};
pub use compare::{CaseResult, Report, build_report, normalize};
pub use config::VerifierConfig;
pub use crossverify_core::LanguageId;
pub use executor::{CommandExecutor, CommandSpec, ExecError, RunResult, SystemExecutor};
pub use runners::{Prepared, PreparedHarness, Runner};
pub use testgen::{TestCase, generate};
pub use verify::{Verification, Verifier, VerifyError, VerifyRequest};
