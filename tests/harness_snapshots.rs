//! Golden snapshot tests for generated harnesses
//!
//! Rendering is pure, so these run without any compiler or interpreter installed.
//!
//! Run with: `cargo test --test harness_snapshots`
//! Review changes: `cargo insta review`

use crossverify::LanguageId;
use crossverify::harness::{self, Harness};

const PY_GCD: &str = "def gcd(a, b):\n    while b:\n        a, b = b, a % b\n    return a\n";

const C_SQUARE: &str = "int square(int x) {\n    return x * x;\n}\n";

const CPP_GCD: &str = "long long gcd(long long a, long long b) {\n    return b == 0 ? a : gcd(b, a % b);\n}\n";

const JAVA_GCD: &str = "import java.util.*;\n\npublic static int gcd(int a, int b) {\n    return b == 0 ? a : gcd(b, a % b);\n}\n";

/// All files of a harness, each under a `==> name <==` header
fn show(harness: &Harness) -> String {
    let mut out = String::new();
    for file in &harness.files {
        out.push_str(&format!("==> {} <==\n", file.name));
        out.push_str(&file.contents);
    }
    out
}

fn rendered(lang: LanguageId, code: &str, function: &str, arity: usize) -> String {
    show(&harness::render(lang, code, function, arity).expect("render failed"))
}

#[test]
fn test_python_gcd_harness() {
    insta::assert_snapshot!("python_gcd", rendered(LanguageId::Python, PY_GCD, "gcd", 2));
}

#[test]
fn test_c_square_harness() {
    insta::assert_snapshot!("c_square", rendered(LanguageId::C, C_SQUARE, "square", 1));
}

#[test]
fn test_c_zero_arity_harness() {
    insta::assert_snapshot!(
        "c_zero_arity",
        rendered(LanguageId::C, "int answer(void) { return 42; }", "answer", 0)
    );
}

#[test]
fn test_cpp_gcd_harness() {
    insta::assert_snapshot!("cpp_gcd", rendered(LanguageId::Cpp, CPP_GCD, "gcd", 2));
}

#[test]
fn test_java_gcd_harness() {
    insta::assert_snapshot!("java_gcd", rendered(LanguageId::Java, JAVA_GCD, "gcd", 2));
}
