//! Configuration management for rastertrace.
//!
//! Configuration is read once at startup and is immutable for the process
//! lifetime. Every option can be set as a command-line argument or an
//! environment variable with the `RT_` prefix.
//!
//! # Environment Variables
//!
//! - `RT_HOST` - Server bind address (default: 0.0.0.0)
//! - `RT_PORT` - Server port (default: 8787)
//! - `RT_TOKEN` - Bearer token shared secret (unset: all requests denied)
//! - `RT_TRACE_SCRIPT` - Path to the external tracing script (required)
//! - `RT_INTERPRETER` - Interpreter binary for the script (default: python3)
//! - `RT_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default interpreter used to launch the trace script.
pub const DEFAULT_INTERPRETER: &str = "python3";

// =============================================================================
// CLI Arguments
// =============================================================================

/// rastertrace - an authenticated image upscale/trace backend.
///
/// Exposes /upscale (resample to a larger PNG) and /trace (vectorize to
/// SVG via an external tool), both behind a shared bearer token.
#[derive(Parser, Debug, Clone)]
#[command(name = "rastertrace")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "RT_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "RT_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Bearer token shared secret.
    ///
    /// When unset or empty, every request to the protected endpoints is
    /// rejected. There is no way to disable authentication.
    #[arg(long, env = "RT_TOKEN")]
    pub token: Option<String>,

    // =========================================================================
    // Trace Tool Configuration
    // =========================================================================
    /// Path to the external tracing script.
    ///
    /// Existence is checked per request, not at startup, so the script may
    /// be deployed after the server boots.
    #[arg(long, env = "RT_TRACE_SCRIPT")]
    pub trace_script: String,

    /// Interpreter binary used to launch the tracing script.
    #[arg(long, default_value = DEFAULT_INTERPRETER, env = "RT_INTERPRETER")]
    pub interpreter: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "RT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.trace_script.trim().is_empty() {
            return Err(
                "trace script path is required. Set --trace-script or RT_TRACE_SCRIPT".to_string(),
            );
        }

        if self.interpreter.trim().is_empty() {
            return Err(
                "interpreter binary is required. Set --interpreter or RT_INTERPRETER".to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the bearer token, empty if unset (empty fails closed).
    pub fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Tests
// =============================================================================
