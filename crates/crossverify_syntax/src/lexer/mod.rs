//! Lexer for Python source.
//!
//! Produces a token stream complete enough to find function headers reliably:
//! - Keywords, identifiers, numbers and punctuation
//! - String literals of every prefix and quote style (skipped as opaque `Str` tokens)
//! - Python-style indentation (INDENT/DEDENT tokens, tabs to the next multiple of 8)
//! - Implicit line continuation inside brackets and explicit `\` continuation
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Punct)
//! - `strings` - String literal scanning
//! - `indent` - INDENT/DEDENT handling

mod indent;
mod strings;
pub mod tokens;

pub use tokens::{Punct, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// [Start of line] → measure indent → [Inside code]
//                                         ↓
//                                        see '(' → push opener
//                                         ↓
//                                        see '\n' → skip (opener stack non-empty)
//                                         ↓
//                                        see ')' → pop opener, check it matches
// ============================================================================

/// Lexer for Python source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    indent_stack: Vec<usize>,
    at_line_start: bool,
    /// Open brackets with their byte offsets, innermost last.
    brackets: Vec<(char, usize)>,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            indent_stack: vec![0],
            at_line_start: true,
            brackets: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// The token stream always ends with a `Newline` (if the last line had content), the pending
    /// `Dedent`s and an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = Span::new(self.current_pos, self.current_pos);
        for (open, offset) in std::mem::take(&mut self.brackets) {
            self.errors.push(SyntaxError::lex(
                format!("'{open}' was never closed"),
                Span::new(offset, offset + 1),
                self.source,
            ));
        }
        if !self.ends_logical_line() {
            self.tokens.push(Token::new(TokenKind::Newline, end));
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, end));
        }
        self.tokens.push(Token::new(TokenKind::Eof, end));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        Some(c)
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn ends_logical_line(&self) -> bool {
        matches!(
            self.tokens.last().map(|t| &t.kind),
            None | Some(TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        )
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        if self.at_line_start && self.brackets.is_empty() {
            self.handle_indentation();
            return;
        }

        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\x0c' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;
        let Some(c) = self.peek() else {
            return;
        };

        match c {
            '#' => self.skip_comment(),
            '\n' => {
                self.advance();
                if !self.brackets.is_empty() {
                    return;
                }
                if !self.ends_logical_line() {
                    self.add_token(TokenKind::Newline, start);
                }
                self.at_line_start = true;
            }
            '\r' => {
                self.advance();
            }
            '\\' => self.scan_continuation(start),
            '"' | '\'' => self.scan_string(start),
            '0'..='9' => self.scan_number(start),
            '.' if self.source[start + 1..].starts_with(|d: char| d.is_ascii_digit()) => self.scan_number(start),
            _ if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_punctuation(start, c),
        }
    }

    /// `\` followed by a newline joins the next physical line onto this logical line.
    fn scan_continuation(&mut self, start: usize) {
        self.advance();
        if self.peek() == Some('\r') {
            self.advance();
        }
        if self.peek() == Some('\n') {
            self.advance();
        } else {
            self.errors.push(SyntaxError::lex(
                "unexpected character after line continuation character",
                Span::new(start, self.current_pos),
                self.source,
            ));
        }
    }

    // ========================================================================
    // Punctuation and brackets
    // ========================================================================

    fn scan_punctuation(&mut self, start: usize, c: char) {
        let Some((spelling, id)) = tokens::match_punct(&self.source[start..]) else {
            self.advance();
            self.errors.push(SyntaxError::lex(
                format!("unexpected character '{c}'"),
                Span::new(start, self.current_pos),
                self.source,
            ));
            return;
        };
        for _ in spelling.chars() {
            self.advance();
        }
        match id {
            Punct::LParen | Punct::LBracket | Punct::LBrace => self.brackets.push((c, start)),
            Punct::RParen | Punct::RBracket | Punct::RBrace => self.close_bracket(c, start),
            _ => {}
        }
        self.add_token(TokenKind::Punctuation(id), start);
    }

    fn close_bracket(&mut self, close: char, start: usize) {
        let span = Span::new(start, start + 1);
        match self.brackets.pop() {
            None => self
                .errors
                .push(SyntaxError::lex(format!("unmatched '{close}'"), span, self.source)),
            Some((open, _)) if matching_close(open) != close => self.errors.push(SyntaxError::lex(
                format!("closing '{close}' does not match opening '{open}'"),
                span,
                self.source,
            )),
            Some(_) => {}
        }
    }

    // ========================================================================
    // Numbers and identifiers
    // ========================================================================

    /// Numeric literals are kept verbatim; exponents may carry a sign (`1e-3`).
    fn scan_number(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.advance();
                if matches!(c, 'e' | 'E')
                    && !self.source[start..].starts_with("0x")
                    && !self.source[start..].starts_with("0X")
                    && matches!(self.peek(), Some('+' | '-'))
                {
                    self.advance();
                }
            } else {
                break;
            }
        }
        let spelling = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::Number(spelling), start);
    }

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let source = self.source;
        let spelling = &source[start..self.current_pos];
        if strings::is_string_prefix(spelling) && matches!(self.peek(), Some('"' | '\'')) {
            self.scan_string(start);
            return;
        }

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            let name = spelling.to_string();
            self.add_token(TokenKind::Ident(name), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn matching_close(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossverify_core::lang::keywords::{self, KeywordId};

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn count(tokens: &[TokenKind], wanted: &TokenKind) -> usize {
        tokens.iter().filter(|k| *k == wanted).count()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert!(tokens[0].is_keyword(k.id), "{:?} lexed as {:?}", k.id, tokens[0]);
        }
    }

    #[test]
    fn test_punctuation_table_parity() {
        for (spelling, id) in tokens::PUNCTUATION {
            let source = match id {
                Punct::LParen | Punct::RParen => "()",
                Punct::LBracket | Punct::RBracket => "[]",
                Punct::LBrace | Punct::RBrace => "{}",
                _ => spelling,
            };
            let tokens = kinds(source);
            assert!(
                tokens.iter().any(|k| k.is_punct(*id)),
                "{spelling:?} did not produce {id:?}: {tokens:?}"
            );
        }
    }

    #[test]
    fn test_def_header() {
        let tokens = kinds("def f(a, *, b=1) -> int: ...");
        assert!(tokens[0].is_keyword(KeywordId::Def));
        assert_eq!(tokens[1], TokenKind::Ident("f".into()));
        assert!(tokens[2].is_punct(Punct::LParen));
        assert!(tokens[5].is_punct(Punct::Star));
        assert!(tokens.iter().any(|k| k.is_punct(Punct::Arrow)));
        assert!(tokens.iter().any(|k| k.is_punct(Punct::Ellipsis)));
    }

    #[test]
    fn test_indentation() {
        let tokens = kinds("def foo():\n  x = 1\n  y = 2\nx = 3");
        assert_eq!(count(&tokens, &TokenKind::Indent), 1);
        assert_eq!(count(&tokens, &TokenKind::Dedent), 1);
    }

    #[test]
    fn test_multiple_dedents_at_eof() {
        let tokens = kinds("def foo():\n  if True:\n    x = 1\n");
        assert_eq!(count(&tokens, &TokenKind::Indent), 2);
        assert_eq!(count(&tokens, &TokenKind::Dedent), 2);
        assert_eq!(tokens.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_tab_rounds_to_multiple_of_eight() {
        // A tab and eight spaces are the same column, so no dedent between the two body lines.
        let tokens = kinds("def foo():\n\tx = 1\n        y = 2\n");
        assert_eq!(count(&tokens, &TokenKind::Indent), 1);
        assert_eq!(count(&tokens, &TokenKind::Dedent), 1);
    }

    #[test]
    fn test_blank_and_comment_lines_do_not_dedent() {
        let tokens = kinds("def foo():\n    x = 1\n\n# note\n   \n    return x\n");
        assert_eq!(count(&tokens, &TokenKind::Indent), 1);
        assert_eq!(count(&tokens, &TokenKind::Dedent), 1);
    }

    #[test]
    fn test_bad_dedent_is_an_error() {
        let errors = lex("def foo():\n    x = 1\n  y = 2\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unindent does not match"));
        assert_eq!(errors[0].line, 3);
    }

    #[test]
    fn test_newlines_inside_brackets() {
        let tokens = kinds("foo(\n  x,\n  y\n)");
        assert_eq!(count(&tokens, &TokenKind::Newline), 1);
        assert_eq!(count(&tokens, &TokenKind::Indent), 0);
    }

    #[test]
    fn test_backslash_continuation() {
        let tokens = kinds("x = 1 + \\\n    2\n");
        assert_eq!(count(&tokens, &TokenKind::Newline), 1);
        assert_eq!(count(&tokens, &TokenKind::Indent), 0);
    }

    #[test]
    fn test_strings_hide_their_contents() {
        let tokens = kinds("s = 'def g(x):'\nt = \"a\\\"b\"\nu = rb'\\''\n");
        assert_eq!(count(&tokens, &TokenKind::Str), 3);
        assert!(!tokens.iter().any(|k| k.is_keyword(KeywordId::Def)));
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let tokens = kinds("def f():\n    \"\"\"Doc.\n\ndef g(x): not code\n\"\"\"\n    return 1\n");
        assert_eq!(count(&tokens, &TokenKind::Str), 1);
        assert_eq!(tokens.iter().filter(|k| k.is_keyword(KeywordId::Def)).count(), 1);
    }

    #[test]
    fn test_prefixed_fstring() {
        let tokens = kinds("x = f\"{a}\" + F'{b!r}'");
        assert_eq!(count(&tokens, &TokenKind::Str), 2);
    }

    #[test]
    fn test_unterminated_strings() {
        let errors = lex("x = 'abc\ny = 1\n").unwrap_err();
        assert!(errors[0].message.contains("unterminated string literal"));

        let errors = lex("x = '''abc\n").unwrap_err();
        assert!(errors[0].message.contains("unterminated triple-quoted"));
    }

    #[test]
    fn test_unmatched_and_mismatched_brackets() {
        let errors = lex(")").unwrap_err();
        assert!(errors[0].message.contains("unmatched ')'"));

        let errors = lex("(]").unwrap_err();
        assert!(errors[0].message.contains("does not match"));

        let errors = lex("f(a, b").unwrap_err();
        assert!(errors[0].message.contains("was never closed"));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 3.14 1_000 1e-3 0xFF .5");
        let numbers: Vec<_> = tokens
            .iter()
            .filter_map(|k| match k {
                TokenKind::Number(n) => Some(n.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec!["42", "3.14", "1_000", "1e-3", "0xFF", ".5"]);
    }

    #[test]
    fn test_unicode_identifier_accepted() {
        let tokens = kinds("π = 1");
        assert_eq!(tokens[0], TokenKind::Ident("π".into()));
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = kinds("def f(a):\r\n    return a\r\n");
        assert_eq!(count(&tokens, &TokenKind::Indent), 1);
        assert_eq!(count(&tokens, &TokenKind::Newline), 2);
    }
}
