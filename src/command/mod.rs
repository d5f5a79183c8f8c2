// src/command/mod.rs

//! Command construction.
//!
//! - [`invocation`] holds the per-run value objects (`CommandletInvocation`,
//!   `BuiltCommand`).
//! - [`builder`] resolves configuration into a `BuiltCommand` and exposes
//!   the deterministic log file location.

pub mod builder;
pub mod invocation;

pub use builder::{CommandBuilder, ResolvedPaths, UNATTENDED_FLAG, log_file_name_for};
pub use invocation::{BuiltCommand, CommandletInvocation};
