//! Spans and the signature shapes produced by the scanners.

/// Byte range into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a Python parameter can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Declared before a `/` marker.
    PositionalOnly,
    /// Ordinary parameter, bindable by position or keyword.
    Positional,
    /// `*args`
    VarArgs,
    /// Declared after `*` or `*args`.
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

/// One parameter of a Python `def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub has_default: bool,
}

/// A top-level Python function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    pub is_async: bool,
    /// Span of the function name.
    pub span: Span,
    /// 1-based line of the `def` keyword.
    pub line: usize,
}

impl FunctionSig {
    /// Number of parameters that can be bound positionally (positional-only and ordinary).
    pub fn positional_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::PositionalOnly | ParamKind::Positional))
            .count()
    }
}

/// A function signature found in C, C++ or Java source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSignature {
    pub name: String,
    /// Comma-separated parameters; `()` and `(void)` count as zero.
    pub param_count: usize,
    /// Whether a body (`{`) follows, as opposed to a prototype (`;`).
    pub has_body: bool,
    pub span: Span,
    pub line: usize,
}

/// Compute the 1-based line number of a byte offset.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
