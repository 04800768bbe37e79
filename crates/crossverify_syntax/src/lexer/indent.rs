//! INDENT/DEDENT handling at the start of a logical line.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::SyntaxError;

/// Column width a tab advances to (Python rounds up to the next multiple of 8).
const TAB_WIDTH: usize = 8;

impl Lexer<'_> {
    /// Measure the indentation of the current line and emit INDENT/DEDENT tokens.
    ///
    /// Blank and comment-only lines are consumed whole and never affect the indent stack.
    pub(super) fn handle_indentation(&mut self) {
        let line_start = self.current_pos;
        let mut column = 0usize;
        while let Some(c) = self.peek() {
            match c {
                ' ' => column += 1,
                '\t' => column = (column / TAB_WIDTH + 1) * TAB_WIDTH,
                '\x0c' => column = 0,
                _ => break,
            }
            self.advance();
        }

        match self.peek() {
            None => return,
            Some('#') => {
                self.skip_comment();
                return;
            }
            Some('\r') => {
                self.advance();
                return;
            }
            Some('\n') => {
                self.advance();
                return;
            }
            Some(_) => {}
        }

        self.at_line_start = false;
        let span = Span::new(line_start, self.current_pos);
        let current = self.indent_stack.last().copied().unwrap_or(0);

        if column > current {
            self.indent_stack.push(column);
            self.tokens.push(super::Token::new(TokenKind::Indent, span));
            return;
        }

        while self.indent_stack.last().copied().unwrap_or(0) > column {
            self.indent_stack.pop();
            self.tokens.push(super::Token::new(TokenKind::Dedent, span));
        }
        if self.indent_stack.last().copied().unwrap_or(0) != column {
            self.errors.push(
                SyntaxError::lex("unindent does not match any outer indentation level", span, self.source)
                    .with_hint("mix of tabs and spaces, or a dedent to a column never used above"),
            );
            self.indent_stack.push(column);
        }
    }
}
