//! Verification reports for the terminal.
//!
//! The `verify` command drives a [`VerifyReporter`] once the engine returns. [`ConsoleReporter`] prints
//! pytest-style progress, a FAILURES section and a coloured summary line; [`JsonReporter`] prints the whole
//! [`Verification`] as JSON.

use std::io::{self, Write};
use std::time::Duration;

use crate::compare::CaseResult;
use crate::verify::Verification;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

// ============================================================================
// Reporter trait
// ============================================================================

/// Receives a finished verification, case by case.
pub trait VerifyReporter {
    /// Called once before any case
    fn on_session_start(&mut self, _verification: &Verification) -> io::Result<()> {
        Ok(())
    }

    /// Called for every case, in case order
    fn on_case(&mut self, _index: usize, _case: &CaseResult) -> io::Result<()> {
        Ok(())
    }

    /// Called once after the last case
    fn on_complete(&mut self, verification: &Verification, duration: Duration) -> io::Result<()>;
}

/// Feed `verification` through `reporter`.
pub fn emit(reporter: &mut dyn VerifyReporter, verification: &Verification, duration: Duration) -> io::Result<()> {
    reporter.on_session_start(verification)?;
    for (index, case) in verification.report.cases.iter().enumerate() {
        reporter.on_case(index, case)?;
    }
    reporter.on_complete(verification, duration)
}

// ============================================================================
// Console
// ============================================================================

/// pytest-style console output
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> VerifyReporter for ConsoleReporter<W> {
    fn on_session_start(&mut self, verification: &Verification) -> io::Result<()> {
        let header = self.paint(BOLD, "=================== crossverify session starts ===================");
        writeln!(self.out, "{header}")?;
        writeln!(
            self.out,
            "{}: {} -> {}, arity {}, collected {} case(s)",
            verification.function_name,
            verification.reference_language,
            verification.target_language,
            verification.arity,
            verification.report.total
        )?;
        writeln!(self.out)
    }

    fn on_case(&mut self, _index: usize, case: &CaseResult) -> io::Result<()> {
        if self.verbose {
            let status = if case.ok {
                self.paint(GREEN, "PASSED")
            } else {
                self.paint(RED, "FAILED")
            };
            writeln!(self.out, "case {} {status}", case.args)
        } else {
            let mark = if case.ok { self.paint(GREEN, ".") } else { self.paint(RED, "F") };
            write!(self.out, "{mark}")
        }
    }

    fn on_complete(&mut self, verification: &Verification, duration: Duration) -> io::Result<()> {
        let report = &verification.report;
        if !self.verbose && report.total > 0 {
            writeln!(self.out)?;
        }

        let failures: Vec<&CaseResult> = report.cases.iter().filter(|c| !c.ok).collect();
        if !failures.is_empty() {
            writeln!(self.out)?;
            let title = self.paint(BOLD_RED, "=================== FAILURES ===================");
            writeln!(self.out, "{title}")?;
            for case in failures {
                writeln!(self.out)?;
                let heading = self.paint(
                    BOLD,
                    &format!("___________ {}{} ___________", verification.function_name, case.args),
                );
                writeln!(self.out, "{heading}")?;
                writeln!(self.out, "    expected: {}", case.expected)?;
                writeln!(self.out, "    got:      {}", case.got)?;
                if let Some(error) = &case.error {
                    for line in error.lines() {
                        writeln!(self.out, "    {line}")?;
                    }
                }
            }
        }

        let mut parts = Vec::new();
        if report.passed > 0 {
            parts.push(format!("{} passed", report.passed));
        }
        if report.failed() > 0 {
            parts.push(format!("{} failed", report.failed()));
        }
        if parts.is_empty() {
            parts.push("no cases".to_string());
        }
        let summary = format!(
            "=================== {} in {:.2}s (pass rate {:.1}%) ===================",
            parts.join(", "),
            duration.as_secs_f64(),
            report.pass_rate * 100.0
        );
        let style = if report.all_passed() { BOLD_GREEN } else { BOLD_RED };
        let summary = self.paint(style, &summary);
        writeln!(self.out)?;
        writeln!(self.out, "{summary}")
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Prints the verification as one pretty-printed JSON document.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> VerifyReporter for JsonReporter<W> {
    fn on_complete(&mut self, verification: &Verification, _duration: Duration) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, verification)?;
        writeln!(self.out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compare::build_report;
    use crate::testgen::TestCase;
    use crossverify_core::LanguageId;

    fn verification(candidate: &[&str]) -> Verification {
        let cases = vec![TestCase::new(vec![2]), TestCase::new(vec![3])];
        let report = build_report(&cases, &["4", "9"], candidate);
        Verification {
            function_name: "square".into(),
            reference_language: LanguageId::Python,
            target_language: LanguageId::C,
            arity: 1,
            cases,
            report,
        }
    }

    fn console(v: &Verification, verbose: bool) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), verbose).with_color(false);
        emit(&mut reporter, v, Duration::from_millis(250)).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_console_all_passed() {
        let out = console(&verification(&["4", "9"]), false);
        assert!(out.contains("square: Python -> C, arity 1, collected 2 case(s)"));
        assert!(out.contains("\n..\n"));
        assert!(!out.contains("FAILURES"));
        assert!(out.contains("2 passed in 0.25s (pass rate 100.0%)"));
    }

    #[test]
    fn test_console_failure_section() {
        let out = console(&verification(&["4", "8"]), true);
        assert!(out.contains("case (2) PASSED"));
        assert!(out.contains("case (3) FAILED"));
        assert!(out.contains("___________ square(3) ___________"));
        assert!(out.contains("    expected: 9\n    got:      8\n"));
        assert!(out.contains("1 passed, 1 failed"));
        assert!(out.contains("pass rate 50.0%"));
    }

    #[test]
    fn test_console_colors() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        emit(&mut reporter, &verification(&["4", "8"]), Duration::ZERO).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(out.contains("\x1b[31mF\x1b[0m"));
        assert!(out.contains("\x1b[1;31m==="));
    }

    #[test]
    fn test_json_reporter() {
        let mut reporter = JsonReporter::new(Vec::new());
        emit(&mut reporter, &verification(&["4", "9"]), Duration::ZERO).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["function_name"], "square");
        assert_eq!(value["target_language"], "c");
        assert_eq!(value["report"]["passed"], 2);
        assert_eq!(value["cases"], serde_json::json!([[2], [3]]));
    }
}
