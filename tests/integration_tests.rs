//! End-to-end tests against real toolchains
//!
//! Each test checks for the interpreter or compilers it needs and returns early (printing a note) when
//! they are not installed, so the suite stays green on minimal machines.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crossverify::verify::Stage;
use crossverify::{LanguageId, Runner, VerifierConfig, Verifier, VerifyError, VerifyRequest};

const PY_SQUARE: &str = "def square(x):\n    return x * x\n";
const C_SQUARE: &str = "int square(int x) {\n    return x * x;\n}\n";
const CPP_SQUARE: &str = "int square(int x) { return x * x; }\n";
const JAVA_SQUARE: &str = "public static int square(int x) {\n    return x * x;\n}\n";

const PY_GCD: &str = "def gcd(a, b):\n    a, b = abs(a), abs(b)\n    while b:\n        a, b = b, a % b\n    return a\n";
const C_GCD: &str = "#include <stdlib.h>\n\nint gcd(int a, int b) {\n    a = abs(a);\n    b = abs(b);\n    while (b != 0) {\n        int t = a % b;\n        a = b;\n        b = t;\n    }\n    return a;\n}\n";
const CPP_GCD: &str = "#include <cstdlib>\n\nint gcd(int a, int b) {\n    a = std::abs(a);\n    b = std::abs(b);\n    return b == 0 ? a : gcd(b, a % b);\n}\n";
const JAVA_GCD: &str = "public static int gcd(int a, int b) {\n    a = Math.abs(a);\n    b = Math.abs(b);\n    while (b != 0) {\n        int t = a % b;\n        a = b;\n        b = t;\n    }\n    return a;\n}\n";

/// `true` when `program flag` runs and exits successfully
fn tool_available(program: &str, flag: &str) -> bool {
    Command::new(program)
        .arg(flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn available(lang: LanguageId) -> bool {
    let ok = match lang {
        LanguageId::Python => tool_available("python3", "--version"),
        LanguageId::C => tool_available("gcc", "--version"),
        LanguageId::Cpp => tool_available("g++", "--version"),
        LanguageId::Java => tool_available("javac", "-version") && tool_available("java", "-version"),
    };
    if !ok {
        eprintln!("skipping: {lang} toolchain not installed");
    }
    ok
}

fn config() -> VerifierConfig {
    VerifierConfig::default().with_seed(2024)
}

#[test]
fn test_square_in_every_language() {
    let runner = Runner::new(config());
    let sources = [
        (LanguageId::Python, PY_SQUARE),
        (LanguageId::C, C_SQUARE),
        (LanguageId::Cpp, CPP_SQUARE),
        (LanguageId::Java, JAVA_SQUARE),
    ];
    for (lang, code) in sources {
        if !available(lang) {
            continue;
        }
        let two = runner.run(lang, code, "square", &[2]).unwrap();
        assert!(two.ok, "{lang}: {}", two.stderr);
        assert_eq!(two.stdout.trim(), "4", "{lang}");
        let three = runner.run(lang, code, "square", &[3]).unwrap();
        assert_eq!(three.stdout.trim(), "9", "{lang}");
    }
}

#[test]
fn test_gcd_verifies_in_every_target_language() {
    if !available(LanguageId::Python) {
        return;
    }
    let verifier = Verifier::new(config());
    for (lang, code) in [(LanguageId::C, C_GCD), (LanguageId::Cpp, CPP_GCD), (LanguageId::Java, JAVA_GCD)] {
        if !available(lang) {
            continue;
        }
        let request = VerifyRequest::new(PY_GCD, "gcd", lang, code).with_custom_input(["48", "18"]);
        let verification = verifier.verify(&request).unwrap();
        assert_eq!(verification.arity, 2);
        let report = &verification.report;
        assert!(report.pass_rate >= 0.95, "{lang}: {report:#?}");
        let custom = report.cases.last().unwrap();
        assert_eq!(custom.args.args(), &[48, 18]);
        assert_eq!(custom.expected, "6");
    }
}

#[test]
fn test_invalid_candidate_build_reports_compiler_error() {
    if !available(LanguageId::Python) || !available(LanguageId::C) {
        return;
    }
    let broken = "int square(int x) {\n    return x * x\n}\n";
    let request = VerifyRequest::new(PY_SQUARE, "square", LanguageId::C, broken);
    let err = Verifier::new(config()).verify(&request).unwrap_err();
    match err {
        VerifyError::CandidateFailed { language, stage, detail } => {
            assert_eq!(language, LanguageId::C);
            assert_eq!(stage, Stage::Build);
            assert!(!detail.trim().is_empty());
        }
        other => panic!("expected a candidate build failure, got {other}"),
    }

    let failed = Runner::new(config()).run(LanguageId::C, broken, "square", &[2]).unwrap();
    assert!(!failed.ok);
    assert!(failed.stderr.contains("error"));
}

#[test]
fn test_infinite_loop_is_killed_at_the_timeout() {
    if !available(LanguageId::C) {
        return;
    }
    let spin = "int spin(int x) {\n    volatile int keep = 1;\n    while (keep) { x++; }\n    return x;\n}\n";
    let runner = Runner::new(config().with_run_timeout(Duration::from_secs(1)));
    let start = Instant::now();
    let result = runner.run(LanguageId::C, spin, "spin", &[1]).unwrap();
    let elapsed = start.elapsed();

    assert!(!result.ok);
    assert!(result.timed_out);
    assert_eq!(result.exit_code, -1);
    assert!(result.stderr.contains("TIMEOUT"));
    // compile time plus the one second budget, with generous slack for slow CI machines
    assert!(elapsed < Duration::from_secs(30), "took {elapsed:?}");
}

#[test]
fn test_timeout_also_kills_spawned_subprocesses() {
    if !available(LanguageId::Python) {
        return;
    }
    let spawner = "import subprocess\n\ndef spawn(x):\n    subprocess.Popen(['sleep', '15'])\n    while True:\n        pass\n";
    let runner = Runner::new(config().with_run_timeout(Duration::from_secs(1)));
    let start = Instant::now();
    let result = runner.run(LanguageId::Python, spawner, "spawn", &[1]).unwrap();
    let elapsed = start.elapsed();

    assert!(result.timed_out);
    assert!(!result.ok);
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[test]
fn test_harness_rejects_wrong_argument_count() {
    if !available(LanguageId::Python) {
        return;
    }
    let runner = Runner::new(config());
    let prepared = runner
        .prepare(LanguageId::Python, PY_SQUARE, "square", 1)
        .unwrap()
        .into_ready()
        .unwrap();
    let result = runner.invoke(&prepared, &[1, 2]).unwrap();
    assert!(!result.ok);
    assert_eq!(result.exit_code, 2);
    assert!(result.stderr.contains("expected 1 argument(s), got 2"));
}

#[test]
fn test_prepared_harness_is_reused_across_invocations() {
    if !available(LanguageId::Cpp) {
        return;
    }
    let runner = Runner::new(config());
    let prepared = runner
        .prepare(LanguageId::Cpp, CPP_GCD, "gcd", 2)
        .unwrap()
        .into_ready()
        .unwrap();
    let first = runner.invoke(&prepared, &[12, 18]).unwrap();
    let second = runner.invoke(&prepared, &[-7, 21]).unwrap();
    assert_eq!(first.stdout.trim(), "6");
    assert_eq!(second.stdout.trim(), "7");
    assert_ne!(first.workdir, second.workdir);
    assert!(!first.workdir.exists());
}
