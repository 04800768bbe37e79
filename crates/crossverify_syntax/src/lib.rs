//! Signature-level syntax frontend for crossverify.
//!
//! The engine never needs a full AST of the code it verifies; it needs to know how many positional
//! parameters a named function takes. This crate provides exactly that:
//!
//! - `lexer` + `parser`: a real, indentation-aware tokenizer for Python and a scanner over its top-level
//!   `def` statements.
//! - `clike`: a lightweight tokenizer and signature scanner for C, C++ and Java sources.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: no name resolution, no type checking, no IO.
//! - Errors are [`diagnostics::SyntaxError`] values that carry their source and render through `miette`.
//!
//! ## Examples
//! ```rust
//! use crossverify_syntax::parser;
//!
//! let sig = parser::find_function("def gcd(a, b):\n    return a\n", "gcd").unwrap().unwrap();
//! assert_eq!(sig.positional_count(), 2);
//! ```

pub mod ast;
pub mod clike;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
