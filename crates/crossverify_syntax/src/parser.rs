//! Top-level function signature scanner for Python.
//!
//! Walks the token stream from [`crate::lexer`] and extracts the header of every module-level `def`
//! (sync or async). Bodies, classes and nested functions are skipped by tracking INDENT/DEDENT depth.
//!
//! ## Examples
//!
//! ```rust
//! use crossverify_syntax::parser;
//!
//! let sigs = parser::signatures("def add(a, b=1, *rest, key=None):\n    return a\n").unwrap();
//! assert_eq!(sigs[0].name, "add");
//! assert_eq!(sigs[0].positional_count(), 2);
//! ```

use crate::ast::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{self, Punct, Token, TokenKind};
use crossverify_core::lang::keywords::KeywordId;

// NOTE: split across files with `include!` so every piece stays in one module (private helpers and
// the `Parser` fields remain visible everywhere) without one long source file.

include!("parser/core.rs");
include!("parser/params.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
