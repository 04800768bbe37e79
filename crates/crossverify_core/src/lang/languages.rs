//! Define the closed set of languages the engine can run.
//!
//! This module is the single source of truth for language identity: a stable identifier ([`LanguageId`])
//! plus a const metadata table ([`LANGUAGES`]) with spellings, display names, source extensions and whether
//! the language needs a build step before it can be executed.
//!
//! ## Notes
//! - Lookup via [`from_str`] is case-insensitive and accepts aliases (`py`, `c++`, ...).
//! - Adding a language means adding a variant here *and* a runner adapter in the engine; the set is not
//!   extensible at runtime.
//!
//! ## Examples
//! ```rust
//! use crossverify_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("python3"), Some(LanguageId::Python));
//! assert!(languages::requires_build(LanguageId::Java));
//! assert!(!languages::requires_build(LanguageId::Python));
//! ```

use std::fmt;
use std::str::FromStr;

use super::registry::LangItemInfo;

/// Stable identifier for every supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LanguageId {
    Python,
    C,
    Cpp,
    Java,
}

/// The language whose implementation is treated as authoritative.
pub const REFERENCE_LANGUAGE: LanguageId = LanguageId::Python;

/// How a language gets from source to something runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionModel {
    /// Source is handed straight to an interpreter.
    Interpreted,
    /// Source is compiled ahead of time to a native executable.
    Native,
    /// Source is compiled to bytecode and run on a managed runtime.
    Managed,
}

/// Registry entry for one language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    pub item: LangItemInfo<LanguageId>,
    /// Human-facing name used in reports and error messages.
    pub display_name: &'static str,
    /// File extension of harness sources (without the dot).
    pub extension: &'static str,
    pub execution: ExecutionModel,
}

const fn info(
    id: LanguageId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    display_name: &'static str,
    extension: &'static str,
    execution: ExecutionModel,
    description: &'static str,
) -> LanguageInfo {
    LanguageInfo {
        item: LangItemInfo {
            id,
            canonical,
            aliases,
            description,
        },
        display_name,
        extension,
        execution,
    }
}

/// Registry of all languages.
pub const LANGUAGES: &[LanguageInfo] = &[
    info(
        LanguageId::Python,
        "python",
        &["py", "python3"],
        "Python",
        "py",
        ExecutionModel::Interpreted,
        "Reference language; harness runs under the Python 3 interpreter.",
    ),
    info(
        LanguageId::C,
        "c",
        &["c11"],
        "C",
        "c",
        ExecutionModel::Native,
        "Compiled with optimizations (C11) to a native executable.",
    ),
    info(
        LanguageId::Cpp,
        "cpp",
        &["c++", "cxx", "cc"],
        "C++",
        "cpp",
        ExecutionModel::Native,
        "Compiled with optimizations (C++17) to a native executable.",
    ),
    info(
        LanguageId::Java,
        "java",
        &[],
        "Java",
        "java",
        ExecutionModel::Managed,
        "Two compilation units (container + driver) compiled with javac and run on the JVM.",
    ),
];

/// Full metadata.
///
/// ## Panics
/// - Never for a variant of [`LanguageId`]; the registry guardrail tests keep the table complete.
pub fn info_for(id: LanguageId) -> &'static LanguageInfo {
    LANGUAGES
        .iter()
        .find(|l| l.item.id == id)
        .expect("INVARIANT: every LanguageId has a registry entry")
}

/// Canonical spelling.
pub fn as_str(id: LanguageId) -> &'static str {
    info_for(id).item.canonical
}

/// Aliases.
pub fn aliases(id: LanguageId) -> &'static [&'static str] {
    info_for(id).item.aliases
}

/// Display name (`C++` rather than `cpp`).
pub fn display_name(id: LanguageId) -> &'static str {
    info_for(id).display_name
}

/// Harness source file extension.
pub fn extension(id: LanguageId) -> &'static str {
    info_for(id).extension
}

/// Whether a build step must succeed before the harness can run.
pub fn requires_build(id: LanguageId) -> bool {
    info_for(id).execution != ExecutionModel::Interpreted
}

/// Lookup by spelling (canonical or alias), ignoring ASCII case.
///
/// ## Returns
/// - `Some(LanguageId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<LanguageId> {
    let s = s.trim();
    LANGUAGES
        .iter()
        .find(|l| l.item.canonical.eq_ignore_ascii_case(s) || l.item.aliases.iter().any(|a| a.eq_ignore_ascii_case(s)))
        .map(|l| l.item.id)
}

/// Every language, in registry order.
pub fn all() -> impl Iterator<Item = LanguageId> {
    LANGUAGES.iter().map(|l| l.item.id)
}

impl LanguageId {
    /// Canonical spelling (see [`as_str`]).
    pub fn as_str(self) -> &'static str {
        as_str(self)
    }

    /// Display name (see [`display_name`]).
    pub fn display_name(self) -> &'static str {
        display_name(self)
    }

    /// Whether this is the reference language.
    pub fn is_reference(self) -> bool {
        self == REFERENCE_LANGUAGE
    }

    /// Whether the language needs a build step.
    pub fn requires_build(self) -> bool {
        requires_build(self)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a spelling is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = LANGUAGES.iter().map(|l| l.item.canonical).collect();
        write!(f, "unsupported language '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for LanguageId {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_str(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(from_str("py"), Some(LanguageId::Python));
        assert_eq!(from_str("C++"), Some(LanguageId::Cpp));
        assert_eq!(from_str(" Java "), Some(LanguageId::Java));
        assert_eq!(from_str("rust"), None);
    }

    #[test]
    fn test_display_uses_display_name() {
        assert_eq!(LanguageId::Cpp.to_string(), "C++");
        assert_eq!(LanguageId::Python.to_string(), "Python");
    }

    #[test]
    fn test_only_python_is_interpreted() {
        for id in all() {
            assert_eq!(requires_build(id), id != LanguageId::Python, "{id:?}");
        }
    }

    #[test]
    fn test_unknown_language_message_lists_known() {
        let err = "cobol".parse::<LanguageId>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cobol"));
        assert!(msg.contains("python, c, cpp, java"));
    }
}
