//! C++ harness (`prog.cpp`), built with `-std=c++17`.
//!
//! The call goes through the global namespace (`::f`) so a `using namespace std;` in user code cannot
//! make overload resolution pick a standard-library function of the same name.

use crossverify_core::LanguageId;
use crossverify_core::conventions::{HARNESS_USAGE_EXIT_CODE, PROGRAM_STEM};

use super::{HarnessFile, banner, call_args};

const TEMPLATE: &str = r#"// {banner}
#include <cstddef>
#include <exception>
#include <iostream>
#include <string>

{user_code}

static bool cv_parse(const char *token, long long &out) {
    try {
        std::size_t used = 0;
        out = std::stoll(std::string(token), &used, 10);
        return token[used] == '\0';
    } catch (const std::exception &) {
        return false;
    }
}

int main(int argc, char **argv) {
    long long cv_args[{slots}] = {};
    if (argc - 1 != {arity}) {
        std::cerr << "crossverify harness: expected {arity} argument(s), got " << (argc - 1) << std::endl;
        return {usage_exit};
    }
    for (int i = 0; i < {arity}; ++i) {
        if (!cv_parse(argv[i + 1], cv_args[i])) {
            std::cerr << "crossverify harness: not an integer: " << argv[i + 1] << std::endl;
            return {usage_exit};
        }
    }
    (void)cv_args;
    std::cout << ::{function}({call_args}) << std::endl;
    return 0;
}
"#;

pub fn file_name() -> String {
    format!("{PROGRAM_STEM}.cpp")
}

pub fn render(code: &str, function_name: &str, arity: usize) -> HarnessFile {
    let contents = TEMPLATE
        .replace("{banner}", &banner(LanguageId::Cpp))
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
    fn test_call_is_globally_qualified() {
        let file = render("using namespace std;\nint max(int a, int b) { return a > b ? a : b; }", "max", 2);
        assert_eq!(file.name, "prog.cpp");
        assert!(file.contents.contains("std::cout << ::max(cv_args[0], cv_args[1]) << std::endl;"));
    }

    #[test]
    fn test_arity_check() {
        let file = render("", "f", 1);
        assert!(file.contents.contains("if (argc - 1 != 1)"));
        assert!(file.contents.contains("return 2;"));
    }
}
