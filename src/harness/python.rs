//! Python harness (`prog.py`).
//!
//! The user code comes first so `from __future__` imports stay legal; harness names carry the `_cv_`
//! prefix to stay out of the user's namespace.

use crossverify_core::LanguageId;
use crossverify_core::conventions::{HARNESS_USAGE_EXIT_CODE, PROGRAM_STEM};

use super::{HarnessFile, banner, call_args};

const TEMPLATE: &str = r#"# {banner}
{user_code}


import sys as _cv_sys


def _cv_main(argv):
    if len(argv) != {arity}:
        _cv_sys.stderr.write("crossverify harness: expected {arity} argument(s), got %d\n" % len(argv))
        return {usage_exit}
    try:
        args = [int(token) for token in argv]
    except ValueError:
        _cv_sys.stderr.write("crossverify harness: not an integer argument in %r\n" % (argv,))
        return {usage_exit}
    print({function}({call_args}))
    return 0


if __name__ == "__main__":
    _cv_sys.exit(_cv_main(_cv_sys.argv[1:]))
"#;

pub fn file_name() -> String {
    format!("{PROGRAM_STEM}.py")
}

pub fn render(code: &str, function_name: &str, arity: usize) -> HarnessFile {
    let contents = TEMPLATE
        .replace("{banner}", &banner(LanguageId::Python))
        .replace("{arity}", &arity.to_string())
        .replace("{usage_exit}", &HARNESS_USAGE_EXIT_CODE.to_string())
        .replace("{function}", function_name)
        .replace("{call_args}", &call_args(arity, |i| format!("args[{i}]")))
        .replace("{user_code}", code.trim_end());
    HarnessFile::new(file_name(), contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_arity() {
        let file = render("def f(a, b, c):\n    return a", "f", 3);
        assert_eq!(file.name, "prog.py");
        assert!(file.contents.contains("if len(argv) != 3:"));
        assert!(file.contents.contains("print(f(args[0], args[1], args[2]))"));
    }

    #[test]
    fn test_zero_arity_calls_without_args() {
        let file = render("def f():\n    return 7", "f", 0);
        assert!(file.contents.contains("print(f())"));
    }

    #[test]
    fn test_user_code_precedes_harness_imports() {
        let file = render("from __future__ import annotations\ndef f(x):\n    return x", "f", 1);
        let future = file.contents.find("from __future__").unwrap();
        let sys = file.contents.find("import sys as _cv_sys").unwrap();
        assert!(future < sys);
    }

    #[test]
    fn test_user_code_with_braces_is_verbatim() {
        let code = "def f(x):\n    return len('{arity}{function}') + x";
        let file = render(code, "f", 1);
        assert!(file.contents.contains(code));
    }
}
