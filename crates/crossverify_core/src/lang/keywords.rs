//! Python reserved words, as seen by the signature scanner.
//!
//! Only hard keywords live here. Soft keywords (`match`, `case`, `type`, `_`) are ordinary identifiers
//! outside their statement positions, so the lexer must keep treating them as names (a parameter called
//! `type` is common in real code).

use super::registry::LangItemInfo;

/// Stable identifier for every hard Python keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    False,
    None,
    True,
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,
}

const fn kw(id: KeywordId, canonical: &'static str, description: &'static str) -> LangItemInfo<KeywordId> {
    LangItemInfo {
        id,
        canonical,
        aliases: &[],
        description,
    }
}

/// Registry of hard keywords.
pub const KEYWORDS: &[LangItemInfo<KeywordId>] = &[
    kw(KeywordId::False, "False", "Boolean false literal."),
    kw(KeywordId::None, "None", "The null singleton."),
    kw(KeywordId::True, "True", "Boolean true literal."),
    kw(KeywordId::And, "and", "Boolean conjunction."),
    kw(KeywordId::As, "as", "Alias binding in imports, `with` and `except`."),
    kw(KeywordId::Assert, "assert", "Assertion statement."),
    kw(KeywordId::Async, "async", "Marks a coroutine definition or async statement."),
    kw(KeywordId::Await, "await", "Suspends on an awaitable."),
    kw(KeywordId::Break, "break", "Leaves the innermost loop."),
    kw(KeywordId::Class, "class", "Class definition."),
    kw(KeywordId::Continue, "continue", "Next loop iteration."),
    kw(KeywordId::Def, "def", "Function definition."),
    kw(KeywordId::Del, "del", "Deletes a binding or item."),
    kw(KeywordId::Elif, "elif", "Chained conditional branch."),
    kw(KeywordId::Else, "else", "Fallback branch."),
    kw(KeywordId::Except, "except", "Exception handler clause."),
    kw(KeywordId::Finally, "finally", "Cleanup clause."),
    kw(KeywordId::For, "for", "Iteration statement."),
    kw(KeywordId::From, "from", "Import source or `yield from`."),
    kw(KeywordId::Global, "global", "Declares module-level bindings."),
    kw(KeywordId::If, "if", "Conditional statement or expression."),
    kw(KeywordId::Import, "import", "Import statement."),
    kw(KeywordId::In, "in", "Membership test and loop target separator."),
    kw(KeywordId::Is, "is", "Identity test."),
    kw(KeywordId::Lambda, "lambda", "Anonymous function expression."),
    kw(KeywordId::Nonlocal, "nonlocal", "Declares enclosing-scope bindings."),
    kw(KeywordId::Not, "not", "Boolean negation."),
    kw(KeywordId::Or, "or", "Boolean disjunction."),
    kw(KeywordId::Pass, "pass", "No-op statement."),
    kw(KeywordId::Raise, "raise", "Raises an exception."),
    kw(KeywordId::Return, "return", "Returns from a function."),
    kw(KeywordId::Try, "try", "Exception handling block."),
    kw(KeywordId::While, "while", "Conditional loop."),
    kw(KeywordId::With, "with", "Context manager block."),
    kw(KeywordId::Yield, "yield", "Generator yield."),
];

/// Resolve a spelling to a keyword id. Keywords are case-sensitive.
pub fn from_str(spelling: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == spelling).map(|k| k.id)
}

/// Canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .map(|k| k.canonical)
        .unwrap_or("<unknown>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(from_str("def"), Some(KeywordId::Def));
        assert_eq!(from_str("Def"), None);
        assert_eq!(from_str("None"), Some(KeywordId::None));
    }

    #[test]
    fn test_soft_keywords_are_not_reserved() {
        for soft in ["match", "case", "type", "_"] {
            assert_eq!(from_str(soft), None, "{soft} must stay an identifier");
        }
    }

    #[test]
    fn test_round_trip_every_keyword() {
        for k in KEYWORDS {
            assert_eq!(from_str(as_str(k.id)), Some(k.id));
        }
    }
}
