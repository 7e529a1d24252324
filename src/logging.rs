// src/logging.rs

//! Logging setup for the `plandag` binary (`tracing` + `tracing-subscriber`).
//!
//! The filter is chosen in this order:
//! 1. `--log-level` on the command line, applied to every target;
//! 2. `PLANDAG_LOG`, read as an `EnvFilter` directive string, so
//!    `PLANDAG_LOG=plandag::dag=debug,info` narrows verbose output to the
//!    graph code;
//! 3. `info`.
//!
//! Everything goes to stderr; stdout is reserved for rendered plans.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "PLANDAG_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(directive(level)),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
