//! Runner adapters: turn user source into something runnable and run it.
//!
//! Each language has a [`RunnerAdapter`] that knows how to build and start its harness. The shared
//! lifecycle lives in [`Runner`]:
//!
//! 1. `prepare`: render the harness into a fresh build directory and build it if the language needs it.
//! 2. `invoke`: run the prepared harness with one argument tuple in its own fresh working directory.
//! 3. `run`: `prepare` + `invoke`, with both directories removed before returning.
//!
//! ## Notes
//! - All directories are `tempfile::TempDir`s and are removed on every exit path, timeouts included.
//! - A build failure is a value ([`Prepared::BuildFailed`]), not an error; only infrastructure problems
//!   are [`ExecError`]s.
//! - A prepared build directory is only ever read by invocations, so one preparation can serve many
//!   concurrent invocations.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod java;
pub mod native;
pub mod python;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossverify_core::LanguageId;
use crossverify_core::conventions::WORKDIR_PREFIX;
use tempfile::TempDir;

use crate::config::VerifierConfig;
use crate::executor::{CommandExecutor, CommandSpec, ExecError, RunResult, SystemExecutor};
use crate::harness::{self, Harness};

// ============================================================================
// Adapter seam
// ============================================================================

/// A program plus leading arguments; case arguments are appended at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Per-language knowledge: how to render, build and start a harness.
pub trait RunnerAdapter: Send + Sync {
    fn language(&self) -> LanguageId;

    fn render(&self, code: &str, function_name: &str, arity: usize) -> Result<Harness, ExecError> {
        Ok(harness::render(self.language(), code, function_name, arity)?)
    }

    /// Build command to run inside `build_dir`, or `None` when the language runs from source.
    fn build_command(&self, build_dir: &Path) -> Option<Invocation>;

    /// Command that starts the built harness found in `build_dir`.
    fn run_command(&self, build_dir: &Path) -> Invocation;
}

// ============================================================================
// Prepared harnesses
// ============================================================================

/// A harness that is written (and built, if needed) and ready to be invoked.
#[derive(Debug)]
pub struct PreparedHarness {
    language: LanguageId,
    function_name: String,
    arity: usize,
    build_dir: TempDir,
    invocation: Invocation,
}

impl PreparedHarness {
    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn build_dir(&self) -> &Path {
        self.build_dir.path()
    }
}

/// Outcome of [`Runner::prepare`].
#[derive(Debug)]
pub enum Prepared {
    Ready(PreparedHarness),
    /// The build step ran and failed; the result carries the compiler diagnostic in `stderr`.
    BuildFailed(RunResult),
}

impl Prepared {
    pub fn into_ready(self) -> Result<PreparedHarness, RunResult> {
        match self {
            Prepared::Ready(harness) => Ok(harness),
            Prepared::BuildFailed(result) => Err(result),
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Dispatches to the adapter for a language and owns the prepare/invoke lifecycle.
pub struct Runner {
    executor: Arc<dyn CommandExecutor>,
    config: VerifierConfig,
    adapters: Vec<Box<dyn RunnerAdapter>>,
}

impl Runner {
    /// Runner over real child processes.
    pub fn new(config: VerifierConfig) -> Self {
        Self::with_executor(config, Arc::new(SystemExecutor))
    }

    /// Runner over a caller-supplied executor (tests use a scripted one).
    pub fn with_executor(config: VerifierConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        let toolchain = &config.toolchain;
        let adapters: Vec<Box<dyn RunnerAdapter>> = vec![
            Box::new(python::PythonAdapter::new(&toolchain.python)),
            Box::new(native::NativeAdapter::c(&toolchain.cc)),
            Box::new(native::NativeAdapter::cpp(&toolchain.cxx)),
            Box::new(java::JavaAdapter::new(&toolchain.javac, &toolchain.java)),
        ];
        Self {
            executor,
            config,
            adapters,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// The adapter registered for `language`.
    pub fn adapter(&self, language: LanguageId) -> &dyn RunnerAdapter {
        match self.adapters.iter().find(|a| a.language() == language) {
            Some(adapter) => adapter.as_ref(),
            None => unreachable!("INVARIANT: every LanguageId has an adapter"),
        }
    }

    /// Borrow a runner bound to one language.
    pub fn for_language(&self, language: LanguageId) -> LanguageRunner<'_> {
        LanguageRunner { runner: self, language }
    }

    /// Render, write and (if needed) build a harness for `function_name` with `arity` parameters.
    #[tracing::instrument(skip_all, fields(language = %language, function = function_name, arity = arity))]
    pub fn prepare(
        &self,
        language: LanguageId,
        code: &str,
        function_name: &str,
        arity: usize,
    ) -> Result<Prepared, ExecError> {
        let adapter = self.adapter(language);
        let harness = adapter.render(code, function_name, arity)?;
        let build_dir = fresh_dir()?;
        for file in &harness.files {
            let path = build_dir.path().join(&file.name);
            fs::write(&path, &file.contents).map_err(|source| ExecError::WriteFile { path, source })?;
        }

        if let Some(build) = adapter.build_command(build_dir.path()) {
            let spec = CommandSpec::new(build.program, build_dir.path(), self.config.build_timeout).args(build.args);
            let result = self.executor.execute(&spec)?;
            if !result.ok {
                tracing::debug!(exit_code = result.exit_code, "harness build failed");
                return Ok(Prepared::BuildFailed(result));
            }
        }

        let invocation = adapter.run_command(build_dir.path());
        Ok(Prepared::Ready(PreparedHarness {
            language,
            function_name: function_name.to_string(),
            arity,
            build_dir,
            invocation,
        }))
    }

    /// Run a prepared harness once, in a fresh working directory.
    pub fn invoke(&self, prepared: &PreparedHarness, args: &[i64]) -> Result<RunResult, ExecError> {
        let workdir = fresh_dir()?;
        let spec = CommandSpec::new(
            prepared.invocation.program.clone(),
            workdir.path(),
            self.config.run_timeout,
        )
        .args(prepared.invocation.args.iter().cloned())
        .args(args.iter().map(|a| a.to_string()));
        let result = self.executor.execute(&spec)?;
        tracing::debug!(
            language = %prepared.language,
            ?args,
            ok = result.ok,
            exit_code = result.exit_code,
            "invocation finished"
        );
        Ok(result)
    }

    /// One-shot run: the harness is generated for `args.len()` parameters.
    pub fn run(
        &self,
        language: LanguageId,
        code: &str,
        function_name: &str,
        args: &[i64],
    ) -> Result<RunResult, ExecError> {
        match self.prepare(language, code, function_name, args.len())? {
            Prepared::BuildFailed(result) => Ok(result),
            Prepared::Ready(prepared) => self.invoke(&prepared, args),
        }
    }
}

/// [`Runner`] bound to one language, giving every language the same `run`/`prepare` surface.
#[derive(Clone, Copy)]
pub struct LanguageRunner<'a> {
    runner: &'a Runner,
    language: LanguageId,
}

impl LanguageRunner<'_> {
    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn run(&self, code: &str, function_name: &str, args: &[i64]) -> Result<RunResult, ExecError> {
        self.runner.run(self.language, code, function_name, args)
    }

    pub fn prepare(&self, code: &str, function_name: &str, arity: usize) -> Result<Prepared, ExecError> {
        self.runner.prepare(self.language, code, function_name, arity)
    }
}

fn fresh_dir() -> Result<TempDir, ExecError> {
    tempfile::Builder::new()
        .prefix(WORKDIR_PREFIX)
        .tempdir()
        .map_err(ExecError::Workdir)
}

/// Absolute path of `name` inside `dir`, as a string argument.
pub(crate) fn path_arg(dir: &Path, name: &str) -> String {
    PathBuf::from(dir).join(name).to_string_lossy().into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every command and answers from a script keyed by program name.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<CommandSpec>>,
        fail_builds: bool,
    }

    impl CommandExecutor for Recorder {
        fn execute(&self, spec: &CommandSpec) -> Result<RunResult, ExecError> {
            self.seen.lock().unwrap().push(spec.clone());
            let is_build = matches!(spec.program.as_str(), "gcc" | "g++" | "javac");
            let ok = !(is_build && self.fail_builds);
            Ok(RunResult {
                ok,
                exit_code: if ok { 0 } else { 1 },
                stdout: if is_build { String::new() } else { "42\n".to_string() },
                stderr: if ok { String::new() } else { "prog.c:1: error: boom".to_string() },
                workdir: spec.workdir.clone(),
                timed_out: false,
                duration: Duration::ZERO,
            })
        }
    }

    fn runner(recorder: Arc<Recorder>) -> Runner {
        Runner::with_executor(VerifierConfig::default(), recorder)
    }

    #[test]
    fn test_every_language_has_an_adapter() {
        let runner = Runner::new(VerifierConfig::default());
        for lang in crossverify_core::lang::languages::all() {
            assert_eq!(runner.adapter(lang).language(), lang);
        }
    }

    #[test]
    fn test_prepare_builds_then_invoke_appends_args() {
        let recorder = Arc::new(Recorder::default());
        let runner = runner(recorder.clone());
        let prepared = runner
            .prepare(LanguageId::C, "int f(int a, int b) { return a; }", "f", 2)
            .unwrap()
            .into_ready()
            .unwrap();
        assert!(prepared.build_dir().join("prog.c").exists());

        let result = runner.invoke(&prepared, &[3, -4]).unwrap();
        assert!(result.ok);

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].program, "gcc");
        assert_eq!(seen[0].workdir, prepared.build_dir());
        assert_eq!(seen[0].timeout, Duration::from_secs(60));
        assert_eq!(seen[1].args, vec!["3".to_string(), "-4".to_string()]);
        assert_ne!(seen[1].workdir, prepared.build_dir());
        assert_eq!(seen[1].timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_each_invocation_gets_a_fresh_directory_that_is_removed() {
        let recorder = Arc::new(Recorder::default());
        let runner = runner(recorder.clone());
        let prepared = runner
            .prepare(LanguageId::Python, "def f(a):\n    return a\n", "f", 1)
            .unwrap()
            .into_ready()
            .unwrap();
        let first = runner.invoke(&prepared, &[1]).unwrap();
        let second = runner.invoke(&prepared, &[2]).unwrap();
        assert_ne!(first.workdir, second.workdir);
        assert!(!first.workdir.exists());
        assert!(!second.workdir.exists());
    }

    #[test]
    fn test_build_failure_is_a_value_and_skips_invocation() {
        let recorder = Arc::new(Recorder {
            fail_builds: true,
            ..Default::default()
        });
        let runner = runner(recorder.clone());
        let result = runner
            .for_language(LanguageId::Cpp)
            .run("int f(int a) { return a }", "f", &[1])
            .unwrap();
        assert!(!result.ok);
        assert!(result.stderr.contains("error"));
        assert!(!result.workdir.exists());
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_python_needs_no_build() {
        let recorder = Arc::new(Recorder::default());
        let runner = runner(recorder.clone());
        let result = runner.run(LanguageId::Python, "def f():\n    return 42\n", "f", &[]).unwrap();
        assert_eq!(result.stdout, "42\n");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].program, "python3");
        assert_eq!(seen[0].args[0], "-B");
        assert!(seen[0].args[1].ends_with("prog.py"));
    }

    #[test]
    fn test_invalid_function_name_is_rejected_before_any_command() {
        let recorder = Arc::new(Recorder::default());
        let runner = runner(recorder.clone());
        let err = runner.run(LanguageId::Java, "", "f(); System.exit(0", &[1]).unwrap_err();
        assert!(matches!(err, ExecError::Harness(_)));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
