//! Diagnostics for the signature scanners.
//!
//! Errors carry the scanned source so they render with a labelled snippet through `miette`.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

/// Which scanner produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Tokenization failed (unterminated string, bad indentation, unbalanced bracket).
    Lex,
    /// Tokens were fine but a `def` header was malformed.
    Syntax,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "lex error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A source-located scanning error.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{kind}: {message} (line {line})")]
#[diagnostic(code(crossverify::syntax))]
pub struct SyntaxError {
    pub message: String,
    pub kind: ErrorKind,
    pub span: Span,
    pub line: usize,
    #[source_code]
    source_text: String,
    #[label("here")]
    label: SourceSpan,
    #[help]
    pub hint: Option<String>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span, source: &str) -> Self {
        let start = span.start.min(source.len());
        Self {
            message: message.into(),
            kind,
            span,
            line: crate::ast::line_of(source, start),
            source_text: source.to_string(),
            label: SourceSpan::from((start, span.len().min(source.len() - start))),
            hint: None,
        }
    }

    pub fn lex(message: impl Into<String>, span: Span, source: &str) -> Self {
        Self::new(ErrorKind::Lex, message, span, source)
    }

    pub fn syntax(message: impl Into<String>, span: Span, source: &str) -> Self {
        Self::new(ErrorKind::Syntax, message, span, source)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_computed_from_span() {
        let source = "a\nb\nc";
        let err = SyntaxError::lex("boom", Span::new(4, 5), source);
        assert_eq!(err.line, 3);
        assert_eq!(err.to_string(), "lex error: boom (line 3)");
    }

    #[test]
    fn test_span_past_end_is_clamped() {
        let err = SyntaxError::syntax("eof", Span::new(10, 12), "abc");
        assert_eq!(err.line, 1);
    }
}
