//! Signature scanner for C, C++ and Java.
//!
//! These languages share enough surface syntax that one tokenizer covers all three for the purpose of
//! locating a function header and counting its parameters:
//! - comments (`//`, `/* */`), preprocessor lines, string/char literals, Java text blocks and C++ raw
//!   strings are skipped so their contents can never look like code;
//! - brace scopes are tracked so only declarations at namespace/class level are considered, never calls
//!   inside function bodies.
//!
//! ## Notes
//! - A parameter list of `()` or `(void)` counts as zero.
//! - Commas inside nested brackets or template/generic angle brackets do not split parameters.
//!
//! ## Examples
//! ```rust
//! use crossverify_syntax::clike;
//!
//! let source = "static long f(const std::vector<std::pair<int, int>>& v, int k) { return k; }";
//! assert_eq!(clike::find_function(source, "f").unwrap().unwrap().param_count, 2);
//! ```

use crate::ast::{CSignature, Span, line_of};
use crate::diagnostics::SyntaxError;

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CTokenKind {
    Ident(String),
    Number,
    /// String, char, text-block or raw-string literal.
    Literal,
    /// `::`
    PathSep,
    /// `->`
    Arrow,
    /// `...`
    Ellipsis,
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CToken {
    pub kind: CTokenKind,
    pub span: Span,
}

impl CToken {
    fn is(&self, c: char) -> bool {
        self.kind == CTokenKind::Punct(c)
    }

    fn ident(&self) -> Option<&str> {
        match &self.kind {
            CTokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Words that open a scope whose body may contain further function declarations.
const SCOPE_WORDS: &[&str] = &["namespace", "class", "struct", "union", "interface", "enum", "extern", "record"];

/// Words that can precede `name(` in a statement without declaring `name`.
const NON_TYPE_WORDS: &[&str] = &[
    "return", "new", "throw", "else", "case", "sizeof", "delete", "goto", "do", "if", "while", "for", "switch",
    "catch", "assert", "yield", "co_return", "co_await", "co_yield", "typedef", "using", "operator",
];

/// Trailing qualifiers allowed between `)` and the body.
const QUALIFIER_WORDS: &[&str] = &["const", "noexcept", "override", "final", "volatile", "throw", "mutable"];

/// C++ raw-string prefixes (the spelling before the opening quote).
const RAW_STRING_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_start: bool,
    tokens: Vec<CToken>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line_start: true,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        let source = self.source;
        &source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: CTokenKind, start: usize) {
        self.tokens.push(CToken {
            kind,
            span: Span::new(start, self.pos),
        });
        self.line_start = false;
    }

    fn error(&self, message: &str, start: usize) -> SyntaxError {
        SyntaxError::lex(message, Span::new(start, (start + 1).min(self.source.len())), self.source)
    }

    fn run(mut self) -> Result<Vec<CToken>, SyntaxError> {
        while let Some(c) = self.peek_char() {
            let start = self.pos;
            if c == '\n' {
                self.pos += 1;
                self.line_start = true;
            } else if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if c == '#' && self.line_start {
                self.skip_directive();
            } else if self.rest().starts_with("//") {
                self.skip_line();
            } else if self.rest().starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => return Err(self.error("unterminated block comment", start)),
                }
            } else if self.rest().starts_with("\"\"\"") {
                self.scan_text_block(start)?;
            } else if c == '"' || c == '\'' {
                self.scan_quoted(start, c)?;
            } else if c.is_ascii_digit()
                || (c == '.' && self.bytes.get(self.pos + 1).is_some_and(|b| b.is_ascii_digit()))
            {
                self.scan_number(start);
            } else if c.is_alphabetic() || c == '_' || c == '$' {
                self.scan_word(start)?;
            } else if self.rest().starts_with("::") {
                self.pos += 2;
                self.push(CTokenKind::PathSep, start);
            } else if self.rest().starts_with("->") {
                self.pos += 2;
                self.push(CTokenKind::Arrow, start);
            } else if self.rest().starts_with("...") {
                self.pos += 3;
                self.push(CTokenKind::Ellipsis, start);
            } else {
                self.pos += c.len_utf8();
                self.push(CTokenKind::Punct(c), start);
            }
        }
        Ok(self.tokens)
    }

    fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(end) => self.pos += end,
            None => self.pos = self.source.len(),
        }
    }

    /// Preprocessor lines end at the first newline not escaped by `\`.
    fn skip_directive(&mut self) {
        loop {
            self.skip_line();
            let before = self.source[..self.pos].trim_end_matches('\r');
            if before.ends_with('\\') && self.pos < self.source.len() {
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    fn scan_quoted(&mut self, start: usize, quote: char) -> Result<(), SyntaxError> {
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => return Err(self.error("unterminated string or character literal", start)),
                Some(b'\\') => self.pos += 2,
                Some(&b) => {
                    self.pos += 1;
                    if b == quote as u8 {
                        break;
                    }
                }
            }
        }
        self.pos = self.pos.min(self.source.len());
        self.push(CTokenKind::Literal, start);
        Ok(())
    }

    fn scan_text_block(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 3;
        loop {
            if self.bytes.get(self.pos..).is_some_and(|b| b.starts_with(b"\"\"\"")) {
                self.pos += 3;
                break;
            }
            match self.bytes.get(self.pos) {
                None => return Err(self.error("unterminated text block", start)),
                Some(b'\\') => self.pos += 2,
                Some(_) => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.source.len());
        self.push(CTokenKind::Literal, start);
        Ok(())
    }

    /// `R"delim( ... )delim"`; the prefix has already been consumed.
    fn scan_raw_string(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 1;
        let Some(open) = self.rest().find('(') else {
            return Err(self.error("malformed raw string literal", start));
        };
        let delimiter = &self.rest()[..open];
        let terminator = format!("){delimiter}\"");
        self.pos += open + 1;
        match self.rest().find(&terminator) {
            Some(end) => self.pos += end + terminator.len(),
            None => return Err(self.error("unterminated raw string literal", start)),
        }
        self.push(CTokenKind::Literal, start);
        Ok(())
    }

    fn scan_number(&mut self, start: usize) {
        while let Some(c) = self.peek_char() {
            let digit_separator = c == '\'' && self.bytes.get(self.pos + 1).is_some_and(|b| b.is_ascii_alphanumeric());
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || digit_separator {
                self.pos += 1;
                if matches!(c, 'e' | 'E' | 'p' | 'P') && matches!(self.peek_char(), Some('+' | '-')) {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        self.push(CTokenKind::Number, start);
    }

    fn scan_word(&mut self, start: usize) -> Result<(), SyntaxError> {
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let word = &self.source[start..self.pos];
        if self.peek_char() == Some('"') && RAW_STRING_PREFIXES.contains(&word) {
            return self.scan_raw_string(start);
        }
        let word = word.to_string();
        self.push(CTokenKind::Ident(word), start);
        Ok(())
    }
}

/// Tokenize C, C++ or Java source.
pub fn tokenize(source: &str) -> Result<Vec<CToken>, SyntaxError> {
    Tokenizer::new(source).run()
}

// ============================================================================
// SIGNATURE SCAN
// ============================================================================

/// Find every function header declared at namespace or class level, in source order.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn signatures(source: &str) -> Result<Vec<CSignature>, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut sigs = Vec::new();
    // One entry per open brace: whether that brace opened a declaration scope.
    let mut scopes: Vec<bool> = Vec::new();
    let mut scope_header = false;
    let mut paren_depth = 0usize;

    for (i, tok) in tokens.iter().enumerate() {
        match &tok.kind {
            CTokenKind::Punct('{') => {
                scopes.push(scope_header && paren_depth == 0);
                scope_header = false;
            }
            CTokenKind::Punct('}') => {
                scopes.pop();
                scope_header = false;
            }
            CTokenKind::Punct(';') => scope_header = false,
            CTokenKind::Punct('(') => paren_depth += 1,
            CTokenKind::Punct(')') => paren_depth = paren_depth.saturating_sub(1),
            CTokenKind::Ident(word) if paren_depth == 0 && SCOPE_WORDS.contains(&word.as_str()) => {
                scope_header = true;
            }
            CTokenKind::Ident(_) if paren_depth == 0 && scopes.iter().all(|s| *s) => {
                if let Some(sig) = signature_at(&tokens, i, source) {
                    sigs.push(sig);
                }
            }
            _ => {}
        }
    }

    Ok(sigs)
}

/// Find the function called `name`, preferring a definition with a body over a bare prototype.
pub fn find_function(source: &str, name: &str) -> Result<Option<CSignature>, SyntaxError> {
    let matching: Vec<CSignature> = signatures(source)?.into_iter().filter(|s| s.name == name).collect();
    let with_body = matching.iter().position(|s| s.has_body);
    Ok(match with_body {
        Some(index) => matching.into_iter().nth(index),
        None => matching.into_iter().next(),
    })
}

/// Try to read a function header whose name is `tokens[i]`.
fn signature_at(tokens: &[CToken], i: usize, source: &str) -> Option<CSignature> {
    let name_tok = &tokens[i];
    let name = name_tok.ident()?;
    if SCOPE_WORDS.contains(&name) || NON_TYPE_WORDS.contains(&name) || QUALIFIER_WORDS.contains(&name) {
        return None;
    }
    if !tokens.get(i + 1)?.is('(') {
        return None;
    }
    let prev = tokens.get(i.checked_sub(1)?)?;
    let declares = match &prev.kind {
        CTokenKind::Ident(word) => !NON_TYPE_WORDS.contains(&word.as_str()),
        CTokenKind::Punct('*' | '&' | '>' | ']') | CTokenKind::PathSep => true,
        _ => false,
    };
    if !declares {
        return None;
    }

    let close = matching_paren(tokens, i + 1)?;
    let has_body = header_tail(tokens, close + 1)?;

    Some(CSignature {
        name: name.to_string(),
        param_count: count_params(&tokens[i + 2..close]),
        has_body,
        span: name_tok.span,
        line: line_of(source, name_tok.span.start),
    })
}

fn matching_paren(tokens: &[CToken], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, tok) in tokens[open..].iter().enumerate() {
        if tok.is('(') {
            depth += 1;
        } else if tok.is(')') {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// Inspect what follows the parameter list. `Some(true)` for a body, `Some(false)` for a prototype.
fn header_tail(tokens: &[CToken], mut j: usize) -> Option<bool> {
    loop {
        let tok = tokens.get(j)?;
        match &tok.kind {
            CTokenKind::Punct('{') | CTokenKind::Punct(':') => return Some(true),
            CTokenKind::Punct(';') | CTokenKind::Punct('=') => return Some(false),
            CTokenKind::Ident(word) if word == "throws" => {
                j += 1;
                while tokens
                    .get(j)
                    .is_some_and(|t| t.ident().is_some() || t.is('.') || t.is(','))
                {
                    j += 1;
                }
            }
            CTokenKind::Ident(word) if QUALIFIER_WORDS.contains(&word.as_str()) => {
                j += 1;
                if tokens.get(j).is_some_and(|t| t.is('(')) {
                    j = matching_paren(tokens, j)? + 1;
                }
            }
            CTokenKind::Punct('&') => j += 1,
            CTokenKind::Arrow => {
                j += 1;
                while tokens.get(j).is_some_and(|t| !t.is('{') && !t.is(';')) {
                    j += 1;
                }
            }
            _ => return None,
        }
    }
}

/// Count comma-separated parameters between the header's parentheses.
fn count_params(inner: &[CToken]) -> usize {
    if inner.is_empty() {
        return 0;
    }
    if inner.len() == 1 && inner[0].ident() == Some("void") {
        return 0;
    }
    let mut depth = 0usize;
    let mut count = 1;
    for tok in inner {
        match tok.kind {
            CTokenKind::Punct('(' | '[' | '{' | '<') => depth += 1,
            CTokenKind::Punct(')' | ']' | '}' | '>') => depth = depth.saturating_sub(1),
            CTokenKind::Punct(',') if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

// ============================================================================
// TESTS
// ============================================================================
