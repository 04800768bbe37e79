//! String literal scanning.
//!
//! Only extent matters to the signature scanner: literals are skipped, not decoded. Escapes are honoured
//! so an escaped quote does not end the literal, and raw strings follow the same rule (`r"\""` is valid).

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::SyntaxError;

/// Whether `spelling` is a legal string prefix (`r`, `b`, `rb`, `f`, `u`, `Rb`, ...).
pub(super) fn is_string_prefix(spelling: &str) -> bool {
    if spelling.is_empty() || spelling.len() > 2 {
        return false;
    }
    let lower = spelling.to_ascii_lowercase();
    matches!(lower.as_str(), "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf")
}

impl Lexer<'_> {
    /// Scan a string literal whose opening quote is the next character.
    pub(super) fn scan_string(&mut self, start: usize) {
        let Some(quote) = self.advance() else {
            return;
        };
        let triple = quote.to_string().repeat(3);
        if self.source[self.current_pos..].starts_with(&triple[..2]) {
            self.advance();
            self.advance();
            self.scan_triple_quoted(start, &triple);
        } else {
            self.scan_single_quoted(start, quote);
        }
    }

    fn scan_single_quoted(&mut self, start: usize, quote: char) {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(SyntaxError::lex(
                        "unterminated string literal",
                        Span::new(start, self.current_pos),
                        self.source,
                    ));
                    return;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) => {
                    self.advance();
                    if c == quote {
                        break;
                    }
                }
            }
        }
        self.add_token(TokenKind::Str, start);
    }

    fn scan_triple_quoted(&mut self, start: usize, triple: &str) {
        loop {
            if self.source[self.current_pos..].starts_with(triple) {
                for _ in 0..3 {
                    self.advance();
                }
                break;
            }
            match self.advance() {
                None => {
                    self.errors.push(SyntaxError::lex(
                        "unterminated triple-quoted string literal",
                        Span::new(start, start + 3),
                        self.source,
                    ));
                    return;
                }
                Some('\\') => {
                    self.advance();
                }
                Some(_) => {}
            }
        }
        self.add_token(TokenKind::Str, start);
    }
}

#[cfg(test)]
mod tests {
    use super::is_string_prefix;

    #[test]
    fn test_string_prefixes() {
        for ok in ["r", "R", "b", "rb", "Br", "f", "rf", "u"] {
            assert!(is_string_prefix(ok), "{ok}");
        }
        for bad in ["", "x", "ub", "fb", "rbf", "bytes"] {
            assert!(!is_string_prefix(bad), "{bad}");
        }
    }
}
