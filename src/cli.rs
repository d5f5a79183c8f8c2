// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `commandlet-runner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "commandlet-runner",
    version,
    about = "Run an engine commandlet, streaming its output to the console and a log file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the run configuration (TOML).
    ///
    /// Default: `Commandlets.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Name of the commandlet, i.e. a `[commandlet.<NAME>]` entry.
    #[arg(value_name = "COMMANDLET")]
    pub commandlet: String,

    /// Files passed to the commandlet, in order.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Target platform (overrides the configured default).
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Log file name under the artifacts root (default `<COMMANDLET>.log`).
    #[arg(long, value_name = "NAME")]
    pub log_file: Option<String>,

    /// Kill the commandlet after this many seconds.
    ///
    /// Overrides `[runner].timeout_secs`.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COMMANDLET_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the command line and log path, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Only print where the log file for this commandlet lives.
    #[arg(long, conflicts_with = "dry_run")]
    pub print_log_path: bool,
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
