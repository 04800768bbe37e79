//! Token types for the Python lexer.
//!
//! Keywords carry registry ids from `crossverify_core::lang::keywords`; punctuation and operators share one
//! [`Punct`] id space since the signature scanner only ever asks "is this a `,` / `*` / `/` ...".

use crate::ast::Span;
use crossverify_core::lang::keywords::{self, KeywordId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Punctuation and operator ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Ellipsis,
    Arrow,
    Walrus,
    Assign,
    /// Any augmented assignment (`+=`, `**=`, ...).
    AugAssign,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    At,
    Plus,
    Minus,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    Shl,
    Shr,
}

/// Spelling table, longest spellings first so prefix matching picks the maximal munch.
pub const PUNCTUATION: &[(&str, Punct)] = &[
    ("...", Punct::Ellipsis),
    ("**=", Punct::AugAssign),
    ("//=", Punct::AugAssign),
    (">>=", Punct::AugAssign),
    ("<<=", Punct::AugAssign),
    ("->", Punct::Arrow),
    (":=", Punct::Walrus),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::LtEq),
    (">=", Punct::GtEq),
    ("<<", Punct::Shl),
    (">>", Punct::Shr),
    ("**", Punct::DoubleStar),
    ("//", Punct::DoubleSlash),
    ("+=", Punct::AugAssign),
    ("-=", Punct::AugAssign),
    ("*=", Punct::AugAssign),
    ("/=", Punct::AugAssign),
    ("%=", Punct::AugAssign),
    ("&=", Punct::AugAssign),
    ("|=", Punct::AugAssign),
    ("^=", Punct::AugAssign),
    ("@=", Punct::AugAssign),
    ("(", Punct::LParen),
    (")", Punct::RParen),
    ("[", Punct::LBracket),
    ("]", Punct::RBracket),
    ("{", Punct::LBrace),
    ("}", Punct::RBrace),
    (",", Punct::Comma),
    (":", Punct::Colon),
    (";", Punct::Semicolon),
    (".", Punct::Dot),
    ("=", Punct::Assign),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("@", Punct::At),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("%", Punct::Percent),
    ("&", Punct::Amp),
    ("|", Punct::Pipe),
    ("^", Punct::Caret),
    ("~", Punct::Tilde),
    ("<", Punct::Lt),
    (">", Punct::Gt),
];

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Punctuation(Punct),

    Ident(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String or bytes literal of any prefix/quote style. Contents are not decoded.
    Str,

    Newline,
    Indent,
    Dedent,

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    pub fn is_punct(&self, id: Punct) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    pub fn is_open_bracket(&self) -> bool {
        matches!(
            self,
            TokenKind::Punctuation(Punct::LParen | Punct::LBracket | Punct::LBrace)
        )
    }

    pub fn is_close_bracket(&self) -> bool {
        matches!(
            self,
            TokenKind::Punctuation(Punct::RParen | Punct::RBracket | Punct::RBrace)
        )
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

/// Longest punctuation spelling that prefixes `rest`.
pub fn match_punct(rest: &str) -> Option<(&'static str, Punct)> {
    PUNCTUATION
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, id)| (*spelling, *id))
}
