//! Trace pipeline: image in, SVG out, via an external tracing tool.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        TraceService                            │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                       trace()                            │  │
//! │  │  1. Check script exists   4. Invoke tool with timeout    │  │
//! │  │  2. Decode base64         5. Inspect exit code           │  │
//! │  │  3. Prepare workspace     6. Read SVG output             │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! │            │                          │                        │
//! │            ▼                          ▼                        │
//! │   ┌────────────────┐        ┌──────────────────┐               │
//! │   │ TraceWorkspace │        │   invoke_trace   │               │
//! │   └────────────────┘        └──────────────────┘               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The workspace is dropped on every exit path, so no temp directory ever
//! outlives the `trace()` call that created it.

pub mod invoker;
pub mod workspace;

pub use invoker::{
    invoke_trace, tail, ProcessResult, STREAM_TAIL_CHARS, TRACE_TIMEOUT_SECS,
};
pub use workspace::{TraceWorkspace, WORKSPACE_PREFIX};

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::codec;
use crate::error::TraceError;
use crate::mime::ImageMime;

/// Service that turns a base64 raster image into SVG text by delegating to
/// the configured external tracing script.
#[derive(Debug, Clone)]
pub struct TraceService {
    interpreter: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl TraceService {
    /// Create a service with the default 180 second timeout.
    pub fn new(interpreter: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_path: script_path.into(),
            timeout: Duration::from_secs(TRACE_TIMEOUT_SECS),
        }
    }

    /// Override the process timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured script path, as reported by the health endpoint.
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Run the full trace pipeline for one request.
    ///
    /// The script-existence check runs before any decoding or workspace
    /// I/O, so a misconfigured deployment fails without wasted work.
    ///
    /// # Errors
    ///
    /// - [`TraceError::ScriptNotFound`] - configured script missing on disk
    /// - [`TraceError::InvalidBase64`] - input is not valid base64
    /// - [`TraceError::LaunchFailed`] / [`TraceError::TimedOut`] - the
    ///   process never produced a usable exit
    /// - [`TraceError::ScriptFailed`] - non-zero exit, with stream tails
    /// - [`TraceError::NoOutput`] - exit zero but no SVG written
    pub async fn trace(&self, image_base64: &str, mime: ImageMime) -> Result<String, TraceError> {
        if !self.script_path.exists() {
            return Err(TraceError::ScriptNotFound {
                path: self.script_path.display().to_string(),
            });
        }

        let raw = codec::decode_base64(image_base64).map_err(|_| TraceError::InvalidBase64)?;

        let workspace = TraceWorkspace::create(mime)?;
        workspace.write_input(&raw).await?;

        debug!(
            workspace = %workspace.path().display(),
            script = %self.script_path.display(),
            "launching trace process"
        );

        let result = invoke_trace(
            &self.interpreter,
            &self.script_path,
            workspace.input_path(),
            workspace.output_path(),
            self.timeout,
        )
        .await?;

        if !result.success() {
            return Err(TraceError::ScriptFailed {
                exit_code: result.exit_code,
                stdout: result.stdout_tail().to_string(),
                stderr: result.stderr_tail().to_string(),
            });
        }

        workspace.read_output().await
    }
}

// =============================================================================
// Tests
// =============================================================================
