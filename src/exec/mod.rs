// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the built commandlet
//! command, using `tokio::process::Command`, and capturing what it prints.
//!
//! - [`launcher`] provides the `ProcessLauncher` trait and the concrete
//!   `TokioLauncher` used in production, which tests can replace with a fake.
//! - [`sink`] contains the console / log file / fan-out line sinks.
//! - [`supervisor`] ties the two together and maps exit codes to outcomes.

pub mod launcher;
pub mod sink;
pub mod supervisor;

pub use launcher::{ExitFuture, ProcessLauncher, SpawnedProcess, TokioLauncher};
pub use sink::{ConsoleSink, FanOut, FileSink, LineSink, SinkFuture};
pub use supervisor::{Supervisor, pump_lines};
