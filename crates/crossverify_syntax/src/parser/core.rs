// ============================================================================
// PARSER STATE
// ============================================================================

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
};

/// Cursor over a lexed token stream.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    /// Current INDENT depth; zero means module level.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
            depth: 0,
        }
    }

    /// Collect the signatures of all module-level functions, in source order.
    pub fn parse_signatures(&mut self) -> Result<Vec<FunctionSig>, SyntaxError> {
        let mut sigs = Vec::new();
        while !self.at_eof() {
            match &self.current().kind {
                TokenKind::Indent => self.depth += 1,
                TokenKind::Dedent => self.depth = self.depth.saturating_sub(1),
                TokenKind::Keyword(KeywordId::Def) if self.depth == 0 => {
                    let is_async = self.pos > 0 && self.tokens[self.pos - 1].kind.is_keyword(KeywordId::Async);
                    sigs.push(self.parse_def(is_async)?);
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
        Ok(sigs)
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    fn current(&self) -> &'a Token {
        let tokens = self.tokens;
        tokens.get(self.pos).unwrap_or(&EOF_TOKEN)
    }

    fn at_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn bump(&mut self) -> &'a Token {
        let tok = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_punct(&mut self, id: Punct, what: &str) -> Result<&'a Token, SyntaxError> {
        if self.current().kind.is_punct(id) {
            Ok(self.bump())
        } else {
            Err(self.error_here(format!("expected {what}")))
        }
    }

    fn error_here(&self, message: String) -> SyntaxError {
        SyntaxError::syntax(message, self.current().span, self.source)
    }

    // ========================================================================
    // Function headers
    // ========================================================================

    /// Parse `def NAME ( params ) [-> annotation] :` starting at the `def` keyword.
    fn parse_def(&mut self, is_async: bool) -> Result<FunctionSig, SyntaxError> {
        let def_span = self.bump().span;

        let (name, span) = match &self.current().kind {
            TokenKind::Ident(name) => (name.clone(), self.current().span),
            _ => return Err(self.error_here("expected function name after 'def'".to_string())),
        };
        self.bump();

        self.expect_punct(Punct::LParen, "'(' after function name")?;
        let segments = self.param_segments()?;
        let params = params_from_segments(&segments, self.source)?;

        if self.current().kind.is_punct(Punct::Arrow) {
            self.bump();
            self.skip_annotation();
        }
        self.expect_punct(Punct::Colon, "':' after function signature")?;

        Ok(FunctionSig {
            name,
            params,
            is_async,
            span,
            line: line_of(self.source, def_span.start),
        })
    }

    /// Split the parameter list into comma-separated segments, consuming the closing `)`.
    ///
    /// Commas nested inside brackets (default values, annotations) do not split.
    fn param_segments(&mut self) -> Result<Vec<Vec<&'a Token>>, SyntaxError> {
        let tokens = self.tokens;
        let mut segments = vec![Vec::new()];
        let mut nesting = 0usize;
        loop {
            let Some(tok) = tokens.get(self.pos) else {
                return Err(self.error_here("unexpected end of input in parameter list".to_string()));
            };
            match &tok.kind {
                TokenKind::Eof => {
                    return Err(self.error_here("unexpected end of input in parameter list".to_string()));
                }
                TokenKind::Punctuation(Punct::RParen) if nesting == 0 => {
                    self.pos += 1;
                    break;
                }
                TokenKind::Punctuation(Punct::Comma) if nesting == 0 => segments.push(Vec::new()),
                kind => {
                    if kind.is_open_bracket() {
                        nesting += 1;
                    } else if kind.is_close_bracket() {
                        nesting = nesting.saturating_sub(1);
                    }
                    if let Some(last) = segments.last_mut() {
                        last.push(tok);
                    }
                }
            }
            self.pos += 1;
        }
        Ok(segments)
    }

    /// Skip a return annotation up to (not including) the header's `:`.
    fn skip_annotation(&mut self) {
        let mut nesting = 0usize;
        while !self.at_eof() {
            let kind = &self.current().kind;
            if nesting == 0 && (kind.is_punct(Punct::Colon) || matches!(kind, TokenKind::Newline)) {
                return;
            }
            if kind.is_open_bracket() {
                nesting += 1;
            } else if kind.is_close_bracket() {
                nesting = nesting.saturating_sub(1);
            }
            self.pos += 1;
        }
    }
}
