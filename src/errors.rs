// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    /// Missing or invalid configuration. Raised before any process is spawned.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The engine executable could not be started.
    #[error("Failed to launch '{}': {source}", .program.display())]
    LaunchError {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log directory or file could not be prepared or written.
    #[error("IO error on '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The commandlet ran but exited non-zero.
    #[error("Commandlet exited with code {code} (log: {})", .log_path.display())]
    ExternalProcessFailure { code: i32, log_path: PathBuf },

    /// The child was killed after exceeding the configured timeout.
    #[error("Commandlet timed out after {secs}s and was killed")]
    Timeout { secs: u64 },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RunnerError {
    /// Exit code the binary should terminate with for this error.
    ///
    /// External failures pass the child's code through unchanged; everything
    /// else is a failure of this tool and maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::ExternalProcessFailure { code, .. } => *code,
            _ => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunnerError::IoError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
