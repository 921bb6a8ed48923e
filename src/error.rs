use thiserror::Error;

/// Errors from the image codec adapter (base64 + decode/resize/encode).
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Input was not valid base64 (strict decoding)
    #[error("Invalid base64 image data")]
    InvalidBase64,

    /// Decoded bytes were not a readable image
    #[error("image decoding failed: {0}")]
    Decode(String),

    /// Re-encoding the resized image failed
    #[error("image encoding failed: {0}")]
    Encode(String),
}

/// Errors from the trace pipeline.
///
/// Launch failure, timeout, and non-zero exit are deliberately separate
/// variants: callers need to tell them apart to build the right diagnostic
/// response, even though several share an HTTP status.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The configured trace script does not exist on disk.
    ///
    /// Checked before any workspace is created.
    #[error("Trace script not found: {path}")]
    ScriptNotFound { path: String },

    /// Input was not valid base64 (strict decoding)
    #[error("Invalid base64 image data")]
    InvalidBase64,

    /// Workspace creation or file I/O failed
    #[error("workspace I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The subprocess could not be spawned at all
    #[error("Trace process launch failed: {0}")]
    LaunchFailed(String),

    /// The subprocess exceeded the wall-clock timeout and was killed
    #[error("Trace process launch failed: timed out after {seconds} seconds")]
    TimedOut { seconds: u64 },

    /// The subprocess ran to completion with a non-zero exit code.
    ///
    /// Stream contents are already truncated to their surfaced tails.
    #[error("Trace script failed with exit code {exit_code}")]
    ScriptFailed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The subprocess exited zero but never wrote the output file
    #[error("Trace script produced no SVG output")]
    NoOutput,
}

// =============================================================================
// Tests
// =============================================================================
