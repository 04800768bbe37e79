//! Arity inference: how many positional parameters does the target function take?
//!
//! - Python is tokenized and scanned for top-level `def`s (see `crossverify_syntax::parser`). Positional-only
//!   and ordinary parameters count; `*args`, keyword-only parameters and `**kwargs` do not.
//! - C, C++ and Java go through the C-family signature scanner first and fall back to a single-line
//!   regex search when the scanner finds nothing (for instance because a stray literal broke
//!   tokenization).
//!
//! [`infer_arity`] is strict; [`infer_arity_or`] never fails and substitutes a fallback instead.

use crossverify_core::LanguageId;
use crossverify_syntax::diagnostics::SyntaxError;
use crossverify_syntax::{clike, parser};
use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// Arity used by [`infer_arity_or`] callers that have no better guess.
pub const DEFAULT_FALLBACK_ARITY: usize = 1;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ArityError {
    #[error("function '{function}' not found in {language} source")]
    #[diagnostic(code(crossverify::arity::not_found))]
    NotFound { function: String, language: LanguageId },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Infer the positional parameter count of `function_name` in `code`.
#[tracing::instrument(skip(code), fields(code_len = code.len()))]
pub fn infer_arity(code: &str, function_name: &str, language: LanguageId) -> Result<usize, ArityError> {
    let not_found = || ArityError::NotFound {
        function: function_name.to_string(),
        language,
    };

    if language == LanguageId::Python {
        let sig = parser::find_function(code, function_name)?.ok_or_else(not_found)?;
        return Ok(sig.positional_count());
    }

    match clike::find_function(code, function_name) {
        Ok(Some(sig)) => return Ok(sig.param_count),
        Ok(None) => {}
        Err(err) => tracing::debug!(error = %err, "signature scanner failed, trying line search"),
    }
    regex_arity(code, function_name).ok_or_else(not_found)
}

/// Like [`infer_arity`], but returns `fallback` (logged at warn level) when inference fails.
pub fn infer_arity_or(code: &str, function_name: &str, language: LanguageId, fallback: usize) -> usize {
    match infer_arity(code, function_name, language) {
        Ok(arity) => arity,
        Err(err) => {
            tracing::warn!(error = %err, fallback, "arity inference failed, using fallback");
            fallback
        }
    }
}

/// Words that can start a line containing `name(...)` without declaring `name`.
const STATEMENT_WORDS: &[&str] = &["return", "else", "case", "new", "throw", "yield", "co_return"];

/// Single-line search for `<type words> name(params)`.
fn regex_arity(code: &str, function_name: &str) -> Option<usize> {
    let pattern = format!(
        r"(?m)^[ \t]*((?:[A-Za-z_$][\w$:<>\[\],]*[ \t*&]+)+){}[ \t]*\(([^)]*)\)",
        regex::escape(function_name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures_iter(code).find_map(|caps| {
        let leading = caps.get(1)?.as_str();
        let first_word = leading.split_whitespace().next().unwrap_or_default();
        if STATEMENT_WORDS.contains(&first_word) {
            return None;
        }
        Some(count_params(caps.get(2)?.as_str()))
    })
}

fn count_params(params: &str) -> usize {
    let params = params.trim();
    if params.is_empty() || params == "void" {
        0
    } else {
        params.split(',').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_positional_params() {
        let code = "def gcd(a, b):\n    while b:\n        a, b = b, a % b\n    return a\n";
        assert_eq!(infer_arity(code, "gcd", LanguageId::Python).unwrap(), 2);
    }

    #[test]
    fn test_python_excludes_star_and_keyword_params() {
        let code = "def f(a, /, b, *args, c=1, **kw):\n    return a\n";
        assert_eq!(infer_arity(code, "f", LanguageId::Python).unwrap(), 2);
    }

    #[test]
    fn test_python_missing_function() {
        let err = infer_arity("def g(x):\n    return x\n", "f", LanguageId::Python).unwrap_err();
        assert_eq!(
            err,
            ArityError::NotFound {
                function: "f".into(),
                language: LanguageId::Python
            }
        );
        assert_eq!(err.to_string(), "function 'f' not found in Python source");
    }

    #[test]
    fn test_python_syntax_error_carries_diagnostic() {
        let err = infer_arity("def f(a, b:\n    return a\n", "f", LanguageId::Python).unwrap_err();
        assert!(matches!(err, ArityError::Syntax(_)));
    }

    #[test]
    fn test_c_family_scanner() {
        assert_eq!(
            infer_arity("int f(int a, int b, int c) { return a; }", "f", LanguageId::C).unwrap(),
            3
        );
        assert_eq!(
            infer_arity("long long f(void) { return 1; }", "f", LanguageId::Cpp).unwrap(),
            0
        );
        assert_eq!(
            infer_arity("public static int f(int n) { return n; }", "f", LanguageId::Java).unwrap(),
            1
        );
    }

    #[test]
    fn test_regex_fallback_after_scanner_error() {
        // The unterminated literal on the last line defeats the tokenizer; the line search still works.
        let code = "int f(int a, int b) { return a + b; }\nconst char *s = \"oops;\n";
        assert!(clike::find_function(code, "f").is_err());
        assert_eq!(infer_arity(code, "f", LanguageId::C).unwrap(), 2);
    }

    #[test]
    fn test_regex_fallback_skips_return_statements() {
        assert_eq!(regex_arity("    return f(1, 2);\nint f(int x) {", "f"), Some(1));
        assert_eq!(regex_arity("    return f(1, 2);\n", "f"), None);
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        assert_eq!(infer_arity_or("int g(int a) { return a; }", "f", LanguageId::C, 1), 1);
        assert_eq!(infer_arity_or("garbage ((", "f", LanguageId::Java, 3), 3);
        assert!(matches!(
            infer_arity("int g(int a) { return a; }", "f", LanguageId::C),
            Err(ArityError::NotFound { .. })
        ));
    }

    #[test]
    fn test_count_params() {
        assert_eq!(count_params(""), 0);
        assert_eq!(count_params(" void "), 0);
        assert_eq!(count_params("int a"), 1);
        assert_eq!(count_params("int a, int b"), 2);
    }
}
