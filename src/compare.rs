//! Output normalization and report building.
//!
//! ## Notes
//! - Only the last non-empty line of a run's stdout is compared, trimmed. Harnesses print the return value
//!   last, so stray debug prints in user code earlier on stdout do not cause mismatches.
//! - Reports are built once and never updated; `total`, `passed` and `pass_rate` are derived from `cases`.

use serde::Serialize;

use crate::testgen::TestCase;

/// Last non-empty line of `text`, trimmed. Empty when there is no such line.
pub fn normalize(text: &str) -> &str {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).last().unwrap_or("")
}

/// What one side produced for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseOutput {
    pub stdout: String,
    /// Set when the invocation did not succeed (non-zero exit, timeout, build failure).
    pub error: Option<String>,
}

impl CaseOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            error: None,
        }
    }

    pub fn failure(stdout: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            error: Some(error.into()),
        }
    }
}

/// Comparison of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub args: TestCase,
    /// Normalized reference output
    pub expected: String,
    /// Normalized candidate output
    pub got: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub cases: Vec<CaseResult>,
}

impl Report {
    pub fn from_cases(cases: Vec<CaseResult>) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.ok).count();
        let pass_rate = if total == 0 { 0.0 } else { passed as f64 / total as f64 };
        Self {
            total,
            passed,
            pass_rate,
            cases,
        }
    }

    /// Correlate outputs by index. Missing outputs count as empty.
    ///
    /// A case passes only when neither side reported an error and the normalized outputs are equal.
    pub fn from_outputs(cases: &[TestCase], reference: &[CaseOutput], candidate: &[CaseOutput]) -> Self {
        let missing = CaseOutput::default();
        let results = cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                let expected = reference.get(i).unwrap_or(&missing);
                let got = candidate.get(i).unwrap_or(&missing);
                let error = match (&expected.error, &got.error) {
                    (Some(e), _) => Some(format!("reference: {e}")),
                    (None, Some(e)) => Some(format!("candidate: {e}")),
                    (None, None) => None,
                };
                let expected_text = normalize(&expected.stdout).to_string();
                let got_text = normalize(&got.stdout).to_string();
                CaseResult {
                    args: case.clone(),
                    ok: error.is_none() && expected_text == got_text,
                    expected: expected_text,
                    got: got_text,
                    error,
                }
            })
            .collect();
        Self::from_cases(results)
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Compare raw stdout texts case by case.
pub fn build_report<S: AsRef<str>>(cases: &[TestCase], reference: &[S], candidate: &[S]) -> Report {
    let to_outputs = |outputs: &[S]| -> Vec<CaseOutput> {
        outputs.iter().map(|o| CaseOutput::success(o.as_ref())).collect()
    };
    Report::from_outputs(cases, &to_outputs(reference), &to_outputs(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cases(n: i64) -> Vec<TestCase> {
        (0..n).map(|i| TestCase::new(vec![i])).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("debug\n42\n"), "42");
        assert_eq!(normalize("  7  \n\n   \n"), "7");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n"), "");
        assert_eq!(normalize("a\r\nb\r\n"), "b");
    }

    #[test]
    fn test_all_match() {
        let report = build_report(&cases(3), &["1\n", "2\n", "3\n"], &["1", "2", "3"]);
        assert_eq!((report.total, report.passed), (3, 3));
        assert_eq!(report.pass_rate, 1.0);
        assert!(report.all_passed());
    }

    #[test]
    fn test_mismatch_and_missing_output() {
        let report = build_report(&cases(3), &["1", "2", "3"], &["1", "5"]);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.cases[1].expected, "2");
        assert_eq!(report.cases[1].got, "5");
        assert_eq!(report.cases[2].got, "");
        assert!((report.pass_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_report() {
        let report = build_report::<&str>(&[], &[], &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.pass_rate, 0.0);
    }

    #[test]
    fn test_error_fails_case_even_when_outputs_agree() {
        let reference = vec![CaseOutput::success("1"), CaseOutput::failure("", "exit code 1")];
        let candidate = vec![CaseOutput::failure("", "TIMEOUT after 1s"), CaseOutput::failure("", "boom")];
        let report = Report::from_outputs(&cases(2), &reference, &candidate);
        assert_eq!(report.passed, 0);
        assert_eq!(report.cases[0].error.as_deref(), Some("candidate: TIMEOUT after 1s"));
        assert_eq!(report.cases[1].error.as_deref(), Some("reference: exit code 1"));
    }

    #[test]
    fn test_serializes_without_empty_error() {
        let report = build_report(&cases(1), &["0"], &["0"]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cases"][0]["args"], serde_json::json!([0]));
        assert!(json["cases"][0].get("error").is_none());
        assert_eq!(json["pass_rate"], serde_json::json!(1.0));
    }
}
