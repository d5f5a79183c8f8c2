// src/lib.rs

pub mod cli;
pub mod command;
pub mod commandlet;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::time::Duration;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::command::CommandletInvocation;
use crate::commandlet::Commandlet;
use crate::config::load_and_validate;
use crate::errors::Result;
use crate::exec::{Supervisor, TokioLauncher};

pub use crate::commandlet::target_log_file;
pub use crate::types::RunOutcome;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - command building
/// - process supervision
///
/// Returns the exit code the tool should terminate with. Under
/// `on_failure = "exit"` a failed commandlet comes back as
/// `RunnerError::ExternalProcessFailure` instead.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_and_validate(&args.config)?;
    let invocation = invocation_from_args(&args);

    if args.print_log_path {
        let path = target_log_file(&cfg, invocation.name(), invocation.log_file_name_override())?;
        println!("{}", path.display());
        return Ok(0);
    }

    let commandlet = Commandlet::new(&cfg, invocation)?;

    if args.dry_run {
        print_dry_run(&commandlet);
        return Ok(0);
    }

    let timeout = args
        .timeout
        .or(cfg.runner.timeout_secs)
        .map(Duration::from_secs);

    let launcher = TokioLauncher;
    let supervisor = Supervisor::new(&launcher).timeout(timeout);
    let outcome = commandlet.run_with(supervisor).await?;

    info!(
        commandlet = commandlet.invocation().name(),
        exit_code = outcome.exit_code(),
        log = %outcome.log_path().display(),
        "commandlet finished"
    );

    Ok(outcome.exit_code())
}

fn invocation_from_args(args: &CliArgs) -> CommandletInvocation {
    let mut invocation = CommandletInvocation::new(&args.commandlet).files(args.files.iter().cloned());
    if let Some(platform) = &args.platform {
        invocation = invocation.platform(platform);
    }
    if let Some(name) = &args.log_file {
        invocation = invocation.log_file_name(name);
    }
    invocation
}

/// Simple dry-run output: the command line and where its log would go.
fn print_dry_run(commandlet: &Commandlet<'_>) {
    println!("commandlet-runner dry-run");
    println!("  commandlet: {}", commandlet.invocation().name());
    println!("  command: {}", commandlet.command());
    println!("  log: {}", commandlet.target_log_file().display());

    debug!("dry-run complete (no execution)");
}
