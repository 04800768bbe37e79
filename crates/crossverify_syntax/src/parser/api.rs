// ============================================================================
// PUBLIC API
// ============================================================================

/// Extract module-level function signatures from an already-lexed token stream.
pub fn parse_signatures(tokens: &[Token], source: &str) -> Result<Vec<FunctionSig>, SyntaxError> {
    Parser::new(tokens, source).parse_signatures()
}

/// Lex and scan `source`, returning every module-level function signature.
///
/// Lexer errors are reported as the first error encountered.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn signatures(source: &str) -> Result<Vec<FunctionSig>, SyntaxError> {
    let tokens = lexer::lex(source).map_err(|mut errors| errors.swap_remove(0))?;
    parse_signatures(&tokens, source)
}

/// Find the first module-level, non-async function called `name`.
pub fn find_function(source: &str, name: &str) -> Result<Option<FunctionSig>, SyntaxError> {
    let sigs = signatures(source)?;
    Ok(sigs.into_iter().find(|sig| sig.name == name && !sig.is_async))
}
