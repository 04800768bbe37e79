//! C harness (`prog.c`), built with `-std=c11`.
//!
//! Arguments are parsed with `strtoll` and the return value is printed through a `long long` cast, so
//! any integral return type prints the same way.

use crossverify_core::LanguageId;
use crossverify_core::conventions::{HARNESS_USAGE_EXIT_CODE, PROGRAM_STEM};

use super::{HarnessFile, banner, call_args};

const TEMPLATE: &str = r#"/* {banner} */
#include <errno.h>
#include <stdio.h>
#include <stdlib.h>

{user_code}

static int cv_parse(const char *token, long long *out) {
    char *end = NULL;
    errno = 0;
    *out = strtoll(token, &end, 10);
    return errno == 0 && end != token && *end == '\0';
}

int main(int argc, char **argv) {
    long long cv_args[{slots}] = {0};
    if (argc - 1 != {arity}) {
        fprintf(stderr, "crossverify harness: expected {arity} argument(s), got %d\n", argc - 1);
        return {usage_exit};
    }
    for (int i = 0; i < {arity}; ++i) {
        if (!cv_parse(argv[i + 1], &cv_args[i])) {
            fprintf(stderr, "crossverify harness: not an integer: %s\n", argv[i + 1]);
            return {usage_exit};
        }
    }
    (void)cv_args;
    printf("%lld\n", (long long){function}({call_args}));
    return 0;
}
"#;

pub fn file_name() -> String {
    format!("{PROGRAM_STEM}.c")
}

pub fn render(code: &str, function_name: &str, arity: usize) -> HarnessFile {
    let contents = TEMPLATE
        .replace("{banner}", &banner(LanguageId::C))
        .replace("{slots}", &arity.max(1).to_string())
        .replace("{arity}", &arity.to_string())
        .replace("{usage_exit}", &HARNESS_USAGE_EXIT_CODE.to_string())
        .replace("{function}", function_name)
        .replace("{call_args}", &call_args(arity, |i| format!("cv_args[{i}]")))
        .replace("{user_code}", code.trim_end());
    HarnessFile::new(file_name(), contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_arity() {
        let file = render("int gcd(int a, int b) { return b ? gcd(b, a % b) : a; }", "gcd", 2);
        assert_eq!(file.name, "prog.c");
        assert!(file.contents.contains("if (argc - 1 != 2)"));
        assert!(file.contents.contains("(long long)gcd(cv_args[0], cv_args[1])"));
        assert!(file.contents.contains("long long cv_args[2]"));
    }

    #[test]
    fn test_zero_arity_keeps_a_valid_array() {
        let file = render("int f(void) { return 1; }", "f", 0);
        assert!(file.contents.contains("long long cv_args[1]"));
        assert!(file.contents.contains("(long long)f()"));
    }

    #[test]
    fn test_wide_arity_has_no_cap() {
        let file = render("", "f", 6);
        assert!(file.contents.contains("cv_args[5])"));
    }
}
