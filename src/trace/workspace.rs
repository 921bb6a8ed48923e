//! Scoped temporary workspace for exchanging files with the trace process.
//!
//! A workspace is a uniquely named temporary directory holding exactly two
//! paths: the input image (extension derived from the MIME table) and the
//! SVG output the external tool is expected to write. The directory is
//! removed recursively when the workspace is dropped, on every exit path
//! from the enclosing pipeline call — success, failure, timeout, or panic.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::TraceError;
use crate::mime::ImageMime;

/// Directory-name prefix for trace workspaces.
pub const WORKSPACE_PREFIX: &str = "rastertrace-";

/// Name of the output file the external tool must write.
const OUTPUT_FILENAME: &str = "output.svg";

/// A request-scoped temporary directory for one trace invocation.
///
/// Dropping the workspace deletes the directory and everything in it.
#[derive(Debug)]
pub struct TraceWorkspace {
    dir: TempDir,
    input_path: PathBuf,
    output_path: PathBuf,
}

impl TraceWorkspace {
    /// Create a fresh workspace.
    ///
    /// The directory name is unique per call, so concurrent requests never
    /// collide.
    pub fn create(mime: ImageMime) -> Result<Self, TraceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()?;

        let input_path = dir.path().join(format!("input.{}", mime.extension()));
        let output_path = dir.path().join(OUTPUT_FILENAME);

        Ok(Self {
            dir,
            input_path,
            output_path,
        })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the input image is written.
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Where the external tool must write its SVG.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write the decoded input image into the workspace.
    pub async fn write_input(&self, bytes: &[u8]) -> Result<(), TraceError> {
        tokio::fs::write(&self.input_path, bytes).await?;
        Ok(())
    }

    /// Read the SVG the external tool wrote.
    ///
    /// A missing file maps to [`TraceError::NoOutput`]: the tool is trusted
    /// for its exit code but not for honoring the output contract. Invalid
    /// UTF-8 in the file is tolerated, not an error.
    pub async fn read_output(&self) -> Result<String, TraceError> {
        match tokio::fs::read(&self.output_path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(TraceError::NoOutput),
            Err(e) => Err(TraceError::Io(e)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
