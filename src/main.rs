//! rastertrace - an authenticated image upscale/trace backend.
//!
//! This binary parses configuration, wires up the trace service, and
//! starts the HTTP server.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rastertrace::{
    config::Config,
    server::{create_router, RouterConfig},
    trace::TraceService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("rastertrace v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Trace script: {}", config.trace_script);
    info!("  Interpreter: {}", config.interpreter);

    // Auth status with a loud warning when no token is configured
    if config.token_or_empty().is_empty() {
        warn!("  Auth: NO TOKEN CONFIGURED - every request will be rejected");
        warn!("        Set --token or RT_TOKEN to accept requests");
    } else {
        info!("  Auth: bearer token configured");
    }

    // Existence is re-checked per request; this is just an early heads-up
    if !Path::new(&config.trace_script).exists() {
        warn!(
            "  Trace script does not currently exist: {}",
            config.trace_script
        );
    }

    let trace_service = TraceService::new(&config.interpreter, &config.trace_script);
    let router = create_router(trace_service, build_router_config(&config));

    let addr = config.bind_address();
    info!("Server listening on: http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "rastertrace=debug,tower_http=debug"
    } else {
        "rastertrace=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new(config.token_or_empty());

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
