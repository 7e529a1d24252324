// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::default_plan_path;
use crate::types::{PartitionKey, PlanStatus, VertexId};

/// Command-line arguments for `plandag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plandag",
    version,
    about = "Inspect and reschedule dependency graphs of planned activities.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Plan.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_plan_path())]
    pub plan: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PLANDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse + validate the plan file and print a summary.
    Check,

    /// Print vertices with their windows and linked edges.
    Show {
        /// Only this partition.
        #[arg(long, value_name = "KEY")]
        partition: Option<PartitionKey>,

        /// Only vertices with this status (`not_started`, `in_progress`,
        /// `completed`, or the codes `0`..`2`).
        #[arg(long, value_name = "STATUS")]
        status: Option<PlanStatus>,
    },

    /// Move a vertex's planned end and push its successors forward.
    Shift {
        #[arg(long, value_name = "KEY")]
        partition: PartitionKey,

        #[arg(long, value_name = "ID")]
        vertex: VertexId,

        /// New planned end (RFC 3339, e.g. `2015-04-01T18:00:00Z`).
        #[arg(long, value_name = "TIME")]
        end: DateTime<Utc>,
    },

    /// Remove a vertex and print what remains of its partition.
    Remove {
        #[arg(long, value_name = "KEY")]
        partition: PartitionKey,

        #[arg(long, value_name = "ID")]
        vertex: VertexId,
    },

    /// Print the first-successor chain below a vertex.
    Chain {
        #[arg(long, value_name = "KEY")]
        partition: PartitionKey,

        #[arg(long, value_name = "ID")]
        vertex: VertexId,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
