//! Harness generation.
//!
//! A harness is the program that exposes a user function to CLI invocation: it embeds the user source
//! verbatim, parses each CLI token into the language's integer type, calls the function with exactly
//! `arity` positional arguments, and prints the return value as the sole line of stdout.
//!
//! Every harness follows the same contract:
//! - wrong argument count or a non-integer token: diagnostic on stderr, exit code
//!   [`HARNESS_USAGE_EXIT_CODE`](crossverify_core::conventions::HARNESS_USAGE_EXIT_CODE);
//! - otherwise the function's return value on stdout and exit code 0 (unless the user code itself fails).
//!
//! ## Module Structure
//!
//! - `python` - `prog.py`
//! - `c` - `prog.c`
//! - `cpp` - `prog.cpp`
//! - `java` - `Translated.java` + `Main.java`
//!
//! Rendering is pure: no IO, so templates are unit- and snapshot-tested without any toolchain.

pub mod c;
pub mod cpp;
pub mod java;
pub mod python;

use crossverify_core::LanguageId;
use crossverify_core::conventions::HARNESS_TEMPLATE_VERSION;
use thiserror::Error;

use crate::version::CROSSVERIFY_VERSION;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessFile {
    pub name: String,
    pub contents: String,
}

impl HarnessFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// All sources of a rendered harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harness {
    pub language: LanguageId,
    pub function_name: String,
    pub arity: usize,
    pub files: Vec<HarnessFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    #[error("'{0}' is not a valid function name (expected an ASCII identifier)")]
    InvalidFunctionName(String),
}

/// Render the harness for `language`.
pub fn render(language: LanguageId, code: &str, function_name: &str, arity: usize) -> Result<Harness, HarnessError> {
    validate_function_name(function_name)?;
    let files = match language {
        LanguageId::Python => vec![python::render(code, function_name, arity)],
        LanguageId::C => vec![c::render(code, function_name, arity)],
        LanguageId::Cpp => vec![cpp::render(code, function_name, arity)],
        LanguageId::Java => java::render(code, function_name, arity),
    };
    Ok(Harness {
        language,
        function_name: function_name.to_string(),
        arity,
        files,
    })
}

/// Function names are spliced into generated code, so only plain identifiers are accepted.
pub fn validate_function_name(name: &str) -> Result<(), HarnessError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(HarnessError::InvalidFunctionName(name.to_string()))
    }
}

/// First line of every harness (after the comment leader for the language).
pub(crate) fn banner(language: LanguageId) -> String {
    format!(
        "Generated by crossverify {CROSSVERIFY_VERSION} (harness v{HARNESS_TEMPLATE_VERSION}, {}). Do not edit.",
        language.as_str()
    )
}

/// `render(0) , render(1) , ...` joined with `, `.
pub(crate) fn call_args(arity: usize, render: impl Fn(usize) -> String) -> String {
    (0..arity).map(render).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name_validation() {
        for ok in ["f", "gcd", "_helper", "sum2", "A_B"] {
            assert!(validate_function_name(ok).is_ok(), "{ok}");
        }
        for bad in ["", "2f", "f()", "f; rm -rf /", "a.b", "naïve"] {
            assert!(validate_function_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_render_rejects_bad_name_for_every_language() {
        for lang in crossverify_core::lang::languages::all() {
            assert!(matches!(
                render(lang, "", "f(1)", 1),
                Err(HarnessError::InvalidFunctionName(_))
            ));
        }
    }

    #[test]
    fn test_file_sets() {
        let names = |lang| {
            render(lang, "", "f", 1)
                .unwrap()
                .files
                .into_iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(LanguageId::Python), vec!["prog.py"]);
        assert_eq!(names(LanguageId::C), vec!["prog.c"]);
        assert_eq!(names(LanguageId::Cpp), vec!["prog.cpp"]);
        assert_eq!(names(LanguageId::Java), vec!["Translated.java", "Main.java"]);
    }

    #[test]
    fn test_call_args() {
        assert_eq!(call_args(0, |i| format!("a[{i}]")), "");
        assert_eq!(call_args(3, |i| format!("a[{i}]")), "a[0], a[1], a[2]");
    }
}
