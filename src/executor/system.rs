//! [`CommandExecutor`] backed by `std::process`.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossverify_core::conventions::{TIMEOUT_EXIT_CODE, TIMEOUT_MARKER};

use super::{CommandExecutor, CommandSpec, ExecError, RunResult};

/// Bytes kept per stream; the rest is drained and dropped so the child never blocks on a full pipe.
pub const MAX_CAPTURE_BYTES: usize = 1 << 20;

const TRUNCATION_NOTE: &str = "\n[output truncated]";

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long the pipes may stay open once the child is gone. Past this, whatever still holds them is a
/// leftover descendant and its process group is killed.
const READER_GRACE: Duration = Duration::from_millis(500);

/// Runs commands as real child processes.
///
/// stdin is null; stdout and stderr are drained on their own threads while the calling thread polls
/// for exit, so neither a chatty nor a silent child can deadlock the executor.
///
/// On Unix the child leads its own process group. A timeout kills the whole group, so descendants
/// that inherited the pipes (`system()`, `fork`, `subprocess.Popen`) die with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<RunResult, ExecError> {
        let started = Instant::now();
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .current_dir(&spec.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            terminate_and_reap_child(&mut child);
            return Err(ExecError::Capture {
                program: spec.program.clone(),
            });
        };
        let (sender, captured) = mpsc::channel();
        let stdout_sender = sender.clone();
        thread::spawn(move || {
            let _ = stdout_sender.send((Stream::Stdout, read_capped(stdout)));
        });
        thread::spawn(move || {
            let _ = sender.send((Stream::Stderr, read_capped(stderr)));
        });

        let waited = wait_with_timeout(&mut child, spec.timeout);
        let pgid = child.id();
        let (stdout, mut stderr) = collect_output(&captured, || kill_process_group(pgid));
        let duration = started.elapsed();

        let status = waited.map_err(|source| ExecError::Wait {
            program: spec.program.clone(),
            source,
        })?;

        let result = match status {
            Some(status) => RunResult {
                ok: status.success(),
                exit_code: exit_code_of(status),
                stdout,
                stderr,
                workdir: spec.workdir.clone(),
                timed_out: false,
                duration,
            },
            None => {
                let marker = format!("{TIMEOUT_MARKER} after {}s", spec.timeout.as_secs_f64());
                stderr = if stderr.is_empty() {
                    marker
                } else {
                    format!("{marker}\n{stderr}")
                };
                RunResult {
                    ok: false,
                    exit_code: TIMEOUT_EXIT_CODE,
                    stdout,
                    stderr,
                    workdir: spec.workdir.clone(),
                    timed_out: true,
                    duration,
                }
            }
        };

        tracing::debug!(
            command = %spec,
            exit_code = result.exit_code,
            timed_out = result.timed_out,
            elapsed_ms = duration.as_millis() as u64,
            "process finished"
        );
        Ok(result)
    }
}

/// Poll until the child exits or `timeout` passes. `Ok(None)` means the child was killed for timing out.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(error) => {
                terminate_and_reap_child(child);
                return Err(error);
            }
        }
        if started.elapsed() >= timeout {
            terminate_and_reap_child(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn terminate_and_reap_child(child: &mut Child) {
    kill_process_group(child.id());
    let _ = child.kill();
    let _ = child.wait();
}

/// SIGKILL every process in the group led by `pgid`.
#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{pgid}")])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(error) = status {
        tracing::warn!(pgid, %error, "could not kill process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Gather both captured streams once the child is gone.
///
/// Readers that have not hit EOF within [`READER_GRACE`] are blocked on a pipe some descendant still
/// holds: `kill_stragglers` runs once and they get one more grace period. A stream that never reports
/// comes back empty.
fn collect_output(captured: &Receiver<(Stream, String)>, kill_stragglers: impl FnOnce()) -> (String, String) {
    let mut stdout = None;
    let mut stderr = None;
    let mut kill_stragglers = Some(kill_stragglers);
    let mut deadline = Instant::now() + READER_GRACE;
    while stdout.is_none() || stderr.is_none() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match captured.recv_timeout(remaining) {
            Ok((Stream::Stdout, text)) => stdout = Some(text),
            Ok((Stream::Stderr, text)) => stderr = Some(text),
            Err(RecvTimeoutError::Timeout) => match kill_stragglers.take() {
                Some(kill) => {
                    kill();
                    deadline = Instant::now() + READER_GRACE;
                }
                None => break,
            },
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    (stdout.unwrap_or_default(), stderr.unwrap_or_default())
}

/// Read a stream to the end, keeping at most [`MAX_CAPTURE_BYTES`].
fn read_capped(mut stream: impl Read) -> String {
    let mut kept = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let room = MAX_CAPTURE_BYTES.saturating_sub(kept.len());
                if n > room {
                    truncated = true;
                }
                kept.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    let mut text = String::from_utf8_lossy(&kept).into_owned();
    if truncated {
        text.push_str(TRUNCATION_NOTE);
    }
    text
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => TIMEOUT_EXIT_CODE,
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(TIMEOUT_EXIT_CODE)
}
