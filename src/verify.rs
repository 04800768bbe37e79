//! The verification workflow: infer arity, generate cases, run both sides, compare.
//!
//! ## Notes
//! - Each side is built once ([`Runner::prepare`]) and invoked once per case, every invocation in its own
//!   working directory.
//! - Per-case failures are recorded on the case. A side that fails on *every* case is a request error, since
//!   the report would say nothing about equivalence.
//! - With `jobs > 1` cases run on scoped threads; outputs are collected in case order.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::sync::Arc;
use std::thread;

use crossverify_core::LanguageId;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::arity::{ArityError, DEFAULT_FALLBACK_ARITY, infer_arity, infer_arity_or};
use crate::compare::{CaseOutput, Report, normalize};
use crate::config::VerifierConfig;
use crate::executor::{CommandExecutor, ExecError, RunResult};
use crate::runners::{Prepared, PreparedHarness, Runner};
use crate::sanitize::strip_code_fences;
use crate::testgen::{CaseGenerator, TestCase};

// ============================================================================
// Request / result
// ============================================================================

/// One verification job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    pub reference_code: String,
    pub reference_language: LanguageId,
    pub function_name: String,
    pub target_language: LanguageId,
    pub target_code: String,
    /// Extra argument tuples, as text; non-integer or wrong-length tuples are dropped.
    pub custom_inputs: Vec<Vec<String>>,
    /// Random tuples to add; `None` uses the config default.
    pub max_random: Option<usize>,
    /// Skips arity inference when set.
    pub param_count: Option<usize>,
}

impl VerifyRequest {
    /// Request with a Python reference.
    pub fn new(
        reference_code: impl Into<String>,
        function_name: impl Into<String>,
        target_language: LanguageId,
        target_code: impl Into<String>,
    ) -> Self {
        Self {
            reference_code: reference_code.into(),
            reference_language: LanguageId::Python,
            function_name: function_name.into(),
            target_language,
            target_code: target_code.into(),
            custom_inputs: Vec::new(),
            max_random: None,
            param_count: None,
        }
    }

    pub fn with_reference_language(mut self, language: LanguageId) -> Self {
        self.reference_language = language;
        self
    }

    pub fn with_custom_input<I, S>(mut self, tuple: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_inputs.push(tuple.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_random(mut self, max_random: usize) -> Self {
        self.max_random = Some(max_random);
        self
    }

    pub fn with_param_count(mut self, param_count: usize) -> Self {
        self.param_count = Some(param_count);
        self
    }
}

/// Result of a successful verification (which may still contain failed cases).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub function_name: String,
    pub reference_language: LanguageId,
    pub target_language: LanguageId,
    pub arity: usize,
    pub cases: Vec<TestCase>,
    pub report: Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Build => "build",
            Stage::Run => "run",
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum VerifyError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Arity(#[from] ArityError),

    #[error("no test cases could be generated for a function of arity {arity}")]
    #[diagnostic(
        code(crossverify::verify::no_cases),
        help("pass --max-random or --input to cover functions with four or more parameters")
    )]
    NoCases { arity: usize },

    #[error("reference implementation ({language}) failed to {stage}: {detail}")]
    #[diagnostic(code(crossverify::verify::reference_failed))]
    ReferenceFailed {
        language: LanguageId,
        stage: Stage,
        detail: String,
    },

    #[error("candidate implementation ({language}) failed to {stage}: {detail}")]
    #[diagnostic(code(crossverify::verify::candidate_failed))]
    CandidateFailed {
        language: LanguageId,
        stage: Stage,
        detail: String,
    },

    #[error(transparent)]
    Exec(#[from] ExecError),
}

// ============================================================================
// Verifier
// ============================================================================

pub struct Verifier {
    runner: Runner,
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            runner: Runner::new(config),
        }
    }

    pub fn with_executor(config: VerifierConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            runner: Runner::with_executor(config, executor),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        self.runner.config()
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Arity the request will be verified at.
    pub fn resolve_arity(&self, request: &VerifyRequest) -> Result<usize, ArityError> {
        if let Some(count) = request.param_count {
            return Ok(count);
        }
        let code = &request.reference_code;
        let name = &request.function_name;
        if request.reference_language.is_reference() {
            infer_arity(code, name, request.reference_language)
        } else {
            Ok(infer_arity_or(code, name, request.reference_language, DEFAULT_FALLBACK_ARITY))
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            function = request.function_name.as_str(),
            reference = %request.reference_language,
            target = %request.target_language
        )
    )]
    pub fn verify(&self, request: &VerifyRequest) -> Result<Verification, VerifyError> {
        let config = self.config();
        let arity = self.resolve_arity(request)?;

        let cases = CaseGenerator::new(config.seed)
            .with_range(config.random_min, config.random_max)
            .generate(
                arity,
                request.max_random.unwrap_or(config.max_random),
                &request.custom_inputs,
            );
        if cases.is_empty() {
            return Err(VerifyError::NoCases { arity });
        }
        tracing::info!(arity, cases = cases.len(), "verifying");

        let target_code = strip_code_fences(&request.target_code);
        let reference = self.prepare_side(request.reference_language, &request.reference_code, request, arity)?;
        let reference = reference.map_err(|failure| VerifyError::ReferenceFailed {
            language: request.reference_language,
            stage: Stage::Build,
            detail: build_detail(&failure),
        })?;
        let candidate = self.prepare_side(request.target_language, target_code, request, arity)?;
        let candidate = candidate.map_err(|failure| VerifyError::CandidateFailed {
            language: request.target_language,
            stage: Stage::Build,
            detail: build_detail(&failure),
        })?;

        let expected = self.run_all(&reference, &cases)?;
        if let Some(detail) = failed_everywhere(&expected) {
            return Err(VerifyError::ReferenceFailed {
                language: request.reference_language,
                stage: Stage::Run,
                detail,
            });
        }
        let got = self.run_all(&candidate, &cases)?;
        if let Some(detail) = failed_everywhere(&got) {
            return Err(VerifyError::CandidateFailed {
                language: request.target_language,
                stage: Stage::Run,
                detail,
            });
        }

        let report = Report::from_outputs(&cases, &expected, &got);
        tracing::info!(passed = report.passed, total = report.total, "verification finished");
        Ok(Verification {
            function_name: request.function_name.clone(),
            reference_language: request.reference_language,
            target_language: request.target_language,
            arity,
            cases,
            report,
        })
    }

    fn prepare_side(
        &self,
        language: LanguageId,
        code: &str,
        request: &VerifyRequest,
        arity: usize,
    ) -> Result<Result<PreparedHarness, RunResult>, ExecError> {
        let prepared: Prepared = self.runner.prepare(language, code, &request.function_name, arity)?;
        Ok(prepared.into_ready())
    }

    fn run_all(&self, prepared: &PreparedHarness, cases: &[TestCase]) -> Result<Vec<CaseOutput>, ExecError> {
        let jobs = self.config().jobs.clamp(1, cases.len().max(1));
        if jobs == 1 {
            return cases.iter().map(|case| self.run_case(prepared, case)).collect();
        }

        let chunk_size = cases.len().div_ceil(jobs);
        thread::scope(|scope| -> Result<Vec<CaseOutput>, ExecError> {
            let handles: Vec<_> = cases
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|case| self.run_case(prepared, case))
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();

            let mut outputs = Vec::with_capacity(cases.len());
            for handle in handles {
                match handle.join() {
                    Ok(chunk) => outputs.extend(chunk?),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            Ok(outputs)
        })
    }

    fn run_case(&self, prepared: &PreparedHarness, case: &TestCase) -> Result<CaseOutput, ExecError> {
        let result = self.runner.invoke(prepared, case.args())?;
        Ok(match result.failure_summary() {
            Some(summary) => CaseOutput::failure(result.stdout, summary),
            None if normalize(&result.stdout).is_empty() => CaseOutput::failure(result.stdout, "no output"),
            None => CaseOutput::success(result.stdout),
        })
    }
}

/// First error, if every output is an error.
fn failed_everywhere(outputs: &[CaseOutput]) -> Option<String> {
    if outputs.is_empty() || outputs.iter().any(|o| o.error.is_none()) {
        return None;
    }
    outputs.first().and_then(|o| o.error.clone())
}

fn build_detail(failure: &RunResult) -> String {
    let stderr = failure.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    failure
        .failure_summary()
        .unwrap_or_else(|| format!("exit code {}", failure.exit_code))
}
