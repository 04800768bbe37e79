//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crossverify_core::LanguageId;

use super::reporter::{self, ConsoleReporter, JsonReporter};
use super::{CliError, CliResult, ExitCode, VerifyArgs};
use crate::arity::{ArityError, DEFAULT_FALLBACK_ARITY, infer_arity, infer_arity_or};
use crate::config::VerifierConfig;
use crate::harness;
use crate::runners::Runner;
use crate::testgen::{CaseGenerator, parse_custom_input};
use crate::verify::{Verifier, VerifyError, VerifyRequest};

// ============================================================================
// Shared helpers
// ============================================================================

fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading {}: {}", path.display(), e)))
}

/// Defaults, then `CROSSVERIFY_*` overrides. Flags are applied by the caller.
fn load_config() -> CliResult<VerifierConfig> {
    VerifierConfig::from_env().map_err(|e| CliError::failure(format!("Error: {e}")))
}

fn arity_error(err: ArityError) -> CliError {
    CliError::diagnostic(err)
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| CliError::failure(format!("Error writing output: {e}")))
}

/// Strict inference for the reference language, best effort for the others.
fn resolve_arity(lang: LanguageId, code: &str, function: &str) -> CliResult<usize> {
    if lang.is_reference() {
        infer_arity(code, function, lang).map_err(arity_error)
    } else {
        Ok(infer_arity_or(code, function, lang, DEFAULT_FALLBACK_ARITY))
    }
}

// ============================================================================
// verify
// ============================================================================

/// Run a verification and report it. Exits 0 only when every case passed.
pub fn verify(args: &VerifyArgs) -> CliResult<ExitCode> {
    let mut config = load_config()?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(jobs) = args.jobs {
        config = config.with_jobs(jobs);
    }
    if let Some(timeout) = args.run_timeout {
        config = config.with_run_timeout(timeout);
    }

    let reference_code = read_source(&args.reference)?;
    let target_code = read_source(&args.target)?;
    let mut request = VerifyRequest::new(reference_code, &args.function, args.target_lang, target_code)
        .with_reference_language(args.reference_lang);
    for input in &args.inputs {
        request = request.with_custom_input(parse_custom_input(input));
    }
    if let Some(max_random) = args.max_random {
        request = request.with_max_random(max_random);
    }
    if let Some(count) = args.param_count {
        request = request.with_param_count(count);
    }

    let verifier = Verifier::new(config);
    let start = Instant::now();
    let verification = verifier.verify(&request).map_err(verify_error)?;
    let elapsed = start.elapsed();

    let stdout = io::stdout().lock();
    let result = if args.json {
        reporter::emit(&mut JsonReporter::new(stdout), &verification, elapsed)
    } else {
        reporter::emit(&mut ConsoleReporter::new(stdout, args.verbose), &verification, elapsed)
    };
    result.map_err(|e| CliError::failure(format!("Error writing report: {e}")))?;

    if verification.report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

fn verify_error(err: VerifyError) -> CliError {
    match err {
        VerifyError::Arity(err) => arity_error(err),
        other => CliError::diagnostic(other),
    }
}

// ============================================================================
// run
// ============================================================================

/// Run `function` once. Prints its stdout and stderr and exits with its exit code.
pub fn run_once(
    lang: LanguageId,
    file: &Path,
    function: &str,
    args: &[i64],
    run_timeout: Option<Duration>,
) -> CliResult<ExitCode> {
    let mut config = load_config()?;
    if let Some(timeout) = run_timeout {
        config = config.with_run_timeout(timeout);
    }
    let code = read_source(file)?;
    let runner = Runner::new(config);
    let result = runner
        .for_language(lang)
        .run(&code, function, args)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    write_stdout(&result.stdout)?;
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
    }
    Ok(match result.exit_code {
        0 if result.ok => ExitCode::SUCCESS,
        code if code > 0 => ExitCode(code),
        _ => ExitCode::FAILURE,
    })
}

// ============================================================================
// arity / cases / harness
// ============================================================================

pub fn print_arity(lang: LanguageId, file: &Path, function: &str, fallback: Option<usize>) -> CliResult<ExitCode> {
    let code = read_source(file)?;
    let arity = match fallback {
        Some(fallback) => infer_arity_or(&code, function, lang, fallback),
        None => infer_arity(&code, function, lang).map_err(arity_error)?,
    };
    println!("{arity}");
    Ok(ExitCode::SUCCESS)
}

pub fn print_cases(arity: usize, max_random: Option<usize>, seed: Option<u64>, inputs: &[String]) -> CliResult<ExitCode> {
    let config = load_config()?;
    let custom: Vec<Vec<String>> = inputs.iter().map(|i| parse_custom_input(i)).collect();
    let cases = CaseGenerator::new(seed.or(config.seed))
        .with_range(config.random_min, config.random_max)
        .generate(arity, max_random.unwrap_or(config.max_random), &custom);
    let json = serde_json::to_string_pretty(&cases)
        .map_err(|e| CliError::failure(format!("Error serializing cases: {e}")))?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

pub fn print_harness(lang: LanguageId, file: &Path, function: &str, arity: Option<usize>) -> CliResult<ExitCode> {
    let code = read_source(file)?;
    let arity = match arity {
        Some(arity) => arity,
        None => resolve_arity(lang, &code, function)?,
    };
    let rendered =
        harness::render(lang, &code, function, arity).map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let mut text = String::new();
    for file in &rendered.files {
        text.push_str(&format!("==> {} <==\n", file.name));
        text.push_str(&file.contents);
        if !file.contents.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');
    }
    write_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.py")).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.starts_with("Error reading /definitely/not/here.py"));
    }

    #[test]
    fn test_resolve_arity_strict_for_reference_language() {
        let err = resolve_arity(LanguageId::Python, "def g(a):\n    return a\n", "f").unwrap_err();
        assert!(err.message.contains("function 'f' not found in Python source"));
        assert_eq!(resolve_arity(LanguageId::C, "int g(int a);", "f").unwrap(), DEFAULT_FALLBACK_ARITY);
    }

    #[test]
    fn test_verify_error_rendering_keeps_message() {
        let err = verify_error(VerifyError::NoCases { arity: 5 });
        assert!(err.message.contains("no test cases could be generated for a function of arity 5"));
    }
}
