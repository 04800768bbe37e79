//! Java harness: `Translated.java` holds the user's methods, `Main.java` the dispatcher.
//!
//! User code is class-body content (static methods), so it is wrapped in `public class Translated`.
//! Leading `import` lines cannot live inside a class body and are hoisted above the wrapper; a leading
//! `package` declaration is dropped since both units compile into the default package.

use crossverify_core::LanguageId;
use crossverify_core::conventions::{HARNESS_USAGE_EXIT_CODE, JAVA_CONTAINER_CLASS, JAVA_DRIVER_CLASS};

use super::{HarnessFile, banner, call_args};

const CONTAINER_TEMPLATE: &str = r#"// {banner}
{imports}
public class {container} {
{user_code}
}
"#;

const DRIVER_TEMPLATE: &str = r#"// {banner}
public class {driver} {
    public static void main(String[] argv) {
        if (argv.length != {arity}) {
            System.err.println("crossverify harness: expected {arity} argument(s), got " + argv.length);
            System.exit({usage_exit});
        }
        int[] cvArgs = new int[{arity}];
        for (int i = 0; i < {arity}; i++) {
            try {
                cvArgs[i] = Integer.parseInt(argv[i]);
            } catch (NumberFormatException e) {
                System.err.println("crossverify harness: not an integer: " + argv[i]);
                System.exit({usage_exit});
            }
        }
        System.out.println({container}.{function}({call_args}));
    }
}
"#;

pub fn container_file_name() -> String {
    format!("{JAVA_CONTAINER_CLASS}.java")
}

pub fn driver_file_name() -> String {
    format!("{JAVA_DRIVER_CLASS}.java")
}

pub fn render(code: &str, function_name: &str, arity: usize) -> Vec<HarnessFile> {
    let (imports, body) = split_imports(code);
    let banner = banner(LanguageId::Java);

    let imports = if imports.is_empty() {
        String::new()
    } else {
        format!("{}\n", imports.join("\n"))
    };
    let container = CONTAINER_TEMPLATE
        .replace("{banner}", &banner)
        .replace("{imports}", &imports)
        .replace("{container}", JAVA_CONTAINER_CLASS)
        .replace("{user_code}", body.trim_end());

    let driver = DRIVER_TEMPLATE
        .replace("{banner}", &banner)
        .replace("{driver}", JAVA_DRIVER_CLASS)
        .replace("{container}", JAVA_CONTAINER_CLASS)
        .replace("{arity}", &arity.to_string())
        .replace("{usage_exit}", &HARNESS_USAGE_EXIT_CODE.to_string())
        .replace("{function}", function_name)
        .replace("{call_args}", &call_args(arity, |i| format!("cvArgs[{i}]")));

    vec![
        HarnessFile::new(container_file_name(), container),
        HarnessFile::new(driver_file_name(), driver),
    ]
}

/// Split leading `import` lines off the user code.
///
/// Blank lines, `//` comments and whole-line `/* ... */` blocks between imports are skipped; the first other
/// line ends the header. A block comment that shares a line with code, or is still open there, stays with the body.
fn split_imports(code: &str) -> (Vec<&str>, &str) {
    let mut imports = Vec::new();
    let mut offset = 0;
    // Start of an unterminated `/* ... */` block
    let mut block_start = None;
    for line in code.split_inclusive('\n') {
        let trimmed = line.trim();
        if block_start.is_some() {
            match trimmed.find("*/") {
                Some(end) if trimmed[end + 2..].trim().is_empty() => block_start = None,
                Some(_) => break,
                None => {}
            }
        } else if trimmed.starts_with("import ") {
            imports.push(trimmed);
        } else if let Some(rest) = trimmed.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) if rest[end + 2..].trim().is_empty() => {}
                Some(_) => break,
                None => block_start = Some(offset),
            }
        } else if !(trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("package ")) {
            break;
        }
        offset += line.len();
    }
    (imports, &code[block_start.unwrap_or(offset)..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_are_hoisted() {
        let code = "import java.util.*;\n\n// helpers\nimport java.math.BigInteger;\npublic static int f(int a) { return a; }\n";
        let files = render(code, "f", 1);
        let container = &files[0].contents;
        let import = container.find("import java.math.BigInteger;").unwrap();
        let class = container.find("public class Translated {").unwrap();
        assert!(import < class);
        assert!(container.contains("public class Translated {\npublic static int f(int a) { return a; }\n}\n"));
    }

    #[test]
    fn test_block_comments_before_imports_are_skipped() {
        let code = "/**\n * Solution.\n */\nimport java.util.List;\n/* one-liner */\nimport java.util.Map;\nstatic int f() { return 0; }\n";
        let (imports, body) = split_imports(code);
        assert_eq!(imports, vec!["import java.util.List;", "import java.util.Map;"]);
        assert_eq!(body, "static int f() { return 0; }\n");

        let files = render(code, "f", 0);
        let container = &files[0].contents;
        assert!(container.find("import java.util.Map;").unwrap() < container.find("public class Translated {").unwrap());
    }

    #[test]
    fn test_comment_attached_to_code_stays_with_the_body() {
        let (imports, body) = split_imports("import java.util.List;\n/* inline */ static int f() { return 0; }\n");
        assert_eq!(imports, vec!["import java.util.List;"]);
        assert_eq!(body, "/* inline */ static int f() { return 0; }\n");

        let (_, body) = split_imports("/**\n * doc\n */ static int f() { return 0; }\n");
        assert_eq!(body, "/**\n * doc\n */ static int f() { return 0; }\n");

        let (_, body) = split_imports("/* never closed\nstatic int f() { return 0; }\n");
        assert_eq!(body, "/* never closed\nstatic int f() { return 0; }\n");
    }

    #[test]
    fn test_package_line_is_dropped() {
        let (imports, body) = split_imports("package demo;\nimport java.util.List;\nstatic int f() { return 0; }");
        assert_eq!(imports, vec!["import java.util.List;"]);
        assert_eq!(body, "static int f() { return 0; }");
    }

    #[test]
    fn test_imports_after_code_stay_put() {
        let (imports, body) = split_imports("static int f() { return 0; }\nimport java.util.List;\n");
        assert!(imports.is_empty());
        assert!(body.contains("import java.util.List;"));
    }

    #[test]
    fn test_driver_dispatch() {
        let files = render("static int f(int a, int b) { return a; }", "f", 2);
        assert_eq!(files[1].name, "Main.java");
        let driver = &files[1].contents;
        assert!(driver.contains("if (argv.length != 2)"));
        assert!(driver.contains("System.out.println(Translated.f(cvArgs[0], cvArgs[1]));"));
        assert!(driver.contains("System.exit(2);"));
    }
}
