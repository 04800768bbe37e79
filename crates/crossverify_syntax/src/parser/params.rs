// ============================================================================
// PARAMETER CLASSIFICATION
// ============================================================================

/// Turn comma-separated parameter segments into classified [`Param`]s.
///
/// Handles the `/` positional-only marker, the bare `*` keyword-only marker, `*args` and `**kwargs`.
/// A trailing comma leaves an empty final segment, which is ignored.
fn params_from_segments(segments: &[Vec<&Token>], source: &str) -> Result<Vec<Param>, SyntaxError> {
    let mut params: Vec<Param> = Vec::new();
    let mut keyword_only = false;
    let mut seen_slash = false;

    for (index, segment) in segments.iter().enumerate() {
        let Some(first) = segment.first() else {
            if index + 1 == segments.len() {
                continue;
            }
            return Err(SyntaxError::syntax(
                "empty parameter",
                segments
                    .get(index + 1)
                    .and_then(|s| s.first())
                    .map(|t| t.span)
                    .unwrap_or_default(),
                source,
            ));
        };

        match &first.kind {
            TokenKind::Punctuation(Punct::Slash) if segment.len() == 1 => {
                if seen_slash || keyword_only {
                    return Err(SyntaxError::syntax("'/' must appear once, before '*'", first.span, source));
                }
                seen_slash = true;
                for param in &mut params {
                    param.kind = ParamKind::PositionalOnly;
                }
            }
            TokenKind::Punctuation(Punct::Star) => {
                if let Some(name) = segment.get(1).and_then(|t| ident_name(t)) {
                    params.push(Param {
                        name,
                        kind: ParamKind::VarArgs,
                        has_default: false,
                    });
                }
                keyword_only = true;
            }
            TokenKind::Punctuation(Punct::DoubleStar) => {
                let name = segment
                    .get(1)
                    .and_then(|t| ident_name(t))
                    .ok_or_else(|| SyntaxError::syntax("expected a name after '**'", first.span, source))?;
                params.push(Param {
                    name,
                    kind: ParamKind::VarKeyword,
                    has_default: false,
                });
            }
            TokenKind::Ident(name) => params.push(Param {
                name: name.clone(),
                kind: if keyword_only {
                    ParamKind::KeywordOnly
                } else {
                    ParamKind::Positional
                },
                has_default: has_top_level_default(segment),
            }),
            _ => {
                return Err(SyntaxError::syntax("unexpected token in parameter list", first.span, source));
            }
        }
    }

    Ok(params)
}

fn ident_name(tok: &Token) -> Option<String> {
    match &tok.kind {
        TokenKind::Ident(name) => Some(name.clone()),
        _ => None,
    }
}

fn has_top_level_default(segment: &[&Token]) -> bool {
    let mut nesting = 0usize;
    for tok in segment {
        if tok.kind.is_open_bracket() {
            nesting += 1;
        } else if tok.kind.is_close_bracket() {
            nesting = nesting.saturating_sub(1);
        } else if nesting == 0 && tok.kind.is_punct(Punct::Assign) {
            return true;
        }
    }
    false
}
