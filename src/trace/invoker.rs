//! External trace process invocation.
//!
//! The tracing tool is a black box: it takes an input file path and an
//! output file path, and is expected to write an SVG to the output path.
//! This module runs it as a subprocess with a bounded wall-clock timeout
//! and captures both output streams.
//!
//! # Design Decisions
//!
//! - **Result, not exception**: a non-zero exit code is data in the
//!   returned [`ProcessResult`], not an error. The pipeline inspects it and
//!   builds the diagnostic response, with both stream tails attached.
//!
//! - **Distinct failure kinds**: failing to launch at all (missing binary,
//!   permissions) and exceeding the timeout are separate error variants, so
//!   callers can tell them apart from an ordinary tool failure.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::TraceError;

/// Wall-clock timeout for the external trace process.
pub const TRACE_TIMEOUT_SECS: u64 = 180;

/// Maximum number of characters of each captured stream that is surfaced.
///
/// Bounds response size and keeps a chatty tool from leaking unbounded logs.
pub const STREAM_TAIL_CHARS: usize = 3000;

// =============================================================================
// Process Result
// =============================================================================

/// Outcome of a completed trace process.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Exit code; -1 if the process was terminated by a signal
    pub exit_code: i32,

    /// Captured stdout, decoded best-effort
    pub stdout: String,

    /// Captured stderr, decoded best-effort
    pub stderr: String,
}

impl ProcessResult {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The last [`STREAM_TAIL_CHARS`] characters of stdout.
    pub fn stdout_tail(&self) -> &str {
        tail(&self.stdout, STREAM_TAIL_CHARS)
    }

    /// The last [`STREAM_TAIL_CHARS`] characters of stderr.
    pub fn stderr_tail(&self) -> &str {
        tail(&self.stderr, STREAM_TAIL_CHARS)
    }
}

/// The last `max_chars` characters of a string.
///
/// Counts characters, not bytes, so the cut never lands inside a UTF-8
/// sequence.
pub fn tail(s: &str, max_chars: usize) -> &str {
    let total = s.chars().count();
    if total <= max_chars {
        return s;
    }

    match s.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

// =============================================================================
// Invocation
// =============================================================================

/// Run the trace tool as `<interpreter> <script> <input> <output>`.
///
/// The subprocess is killed if `timeout` elapses before it exits. Stdout
/// and stderr are captured in full; callers bound them via the tail
/// accessors when surfacing.
///
/// # Errors
///
/// - [`TraceError::LaunchFailed`] if the process cannot be spawned
/// - [`TraceError::TimedOut`] if the wall-clock timeout fires
pub async fn invoke_trace(
    interpreter: &str,
    script: &Path,
    input: &Path,
    output: &Path,
    timeout: Duration,
) -> Result<ProcessResult, TraceError> {
    let mut command = Command::new(interpreter);
    command
        .arg(script)
        .arg(input)
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command
        .spawn()
        .map_err(|e| TraceError::LaunchFailed(e.to_string()))?;

    // Dropping the wait future on timeout drops the child, and
    // kill_on_drop reaps the process.
    let collected = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| TraceError::LaunchFailed(e.to_string()))?,
        Err(_) => {
            return Err(TraceError::TimedOut {
                seconds: timeout.as_secs(),
            })
        }
    };

    Ok(ProcessResult {
        exit_code: collected.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&collected.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&collected.stderr).into_owned(),
    })
}

// =============================================================================
// Tests
// =============================================================================
