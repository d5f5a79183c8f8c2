// src/commandlet.rs

//! One configured commandlet run: build, supervise, apply the failure policy.
//!
//! Commandlets differ only in their `[commandlet.<name>]` settings, so a
//! single value type covers all of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::command::{BuiltCommand, CommandBuilder, CommandletInvocation};
use crate::config::{FailurePolicy, RunConfiguration};
use crate::errors::{Result, RunnerError};
use crate::exec::{ProcessLauncher, Supervisor};
use crate::types::RunOutcome;

#[derive(Debug, Clone)]
pub struct Commandlet<'c> {
    config: &'c RunConfiguration,
    invocation: CommandletInvocation,
    command: BuiltCommand,
    log_path: PathBuf,
}

impl<'c> Commandlet<'c> {
    /// Resolve everything needed to run `invocation`.
    ///
    /// Configuration problems surface here, before any process exists.
    pub fn new(config: &'c RunConfiguration, invocation: CommandletInvocation) -> Result<Self> {
        let builder = CommandBuilder::new(config);
        let command = builder.build(&invocation)?;
        let log_path = builder.target_log_file(&invocation)?;

        Ok(Self {
            config,
            invocation,
            command,
            log_path,
        })
    }

    pub fn invocation(&self) -> &CommandletInvocation {
        &self.invocation
    }

    pub fn command(&self) -> &BuiltCommand {
        &self.command
    }

    /// Where the raw log is (or will be) written.
    pub fn target_log_file(&self) -> &Path {
        &self.log_path
    }

    /// Run with a supervisor configured from `[runner]`, echoing to stdout.
    pub async fn run(&self, launcher: &dyn ProcessLauncher) -> Result<RunOutcome> {
        let timeout = self.config.runner.timeout_secs.map(Duration::from_secs);
        self.run_with(Supervisor::new(launcher).timeout(timeout))
            .await
    }

    /// Run with a caller-provided supervisor.
    pub async fn run_with(&self, mut supervisor: Supervisor<'_>) -> Result<RunOutcome> {
        debug!(commandlet = self.invocation.name(), "starting commandlet run");
        let outcome = supervisor.run(&self.command, &self.log_path).await?;
        apply_failure_policy(outcome, self.config.runner.on_failure)
    }
}

/// `Exit` turns a failed outcome into `ExternalProcessFailure`, which the
/// binary maps to the same exit code. `Report` hands the outcome back as is.
pub fn apply_failure_policy(outcome: RunOutcome, policy: FailurePolicy) -> Result<RunOutcome> {
    match (policy, outcome) {
        (FailurePolicy::Exit, RunOutcome::Failure { code, log_path }) => {
            Err(RunnerError::ExternalProcessFailure { code, log_path })
        }
        (_, outcome) => Ok(outcome),
    }
}

/// Deterministic log location for a commandlet without building a command.
pub fn target_log_file(
    config: &RunConfiguration,
    commandlet: &str,
    log_file_name: Option<&str>,
) -> Result<PathBuf> {
    let mut invocation = CommandletInvocation::new(commandlet);
    if let Some(name) = log_file_name {
        invocation = invocation.log_file_name(name);
    }
    CommandBuilder::new(config).target_log_file(&invocation)
}
