// src/exec/supervisor.rs

//! Runs one built command to completion while capturing its output.

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::BuiltCommand;
use crate::errors::{Result, RunnerError};
use crate::exec::launcher::ProcessLauncher;
use crate::exec::sink::{ConsoleSink, FanOut, FileSink, LineSink};
use crate::types::RunOutcome;

/// Supervises a single commandlet process.
///
/// Each captured line goes to the echo sink (stdout by default) and then to
/// the log file, one line at a time. Nothing is retried.
pub struct Supervisor<'l> {
    launcher: &'l dyn ProcessLauncher,
    echo: Box<dyn LineSink>,
    timeout: Option<Duration>,
}

impl<'l> Supervisor<'l> {
    pub fn new(launcher: &'l dyn ProcessLauncher) -> Self {
        Self {
            launcher,
            echo: Box::new(ConsoleSink::new()),
            timeout: None,
        }
    }

    /// Replace the console sink, e.g. with a recording sink in tests.
    pub fn echo_to(mut self, sink: Box<dyn LineSink>) -> Self {
        self.echo = sink;
        self
    }

    /// Kill the child and fail with `Timeout` if it runs longer than this.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `command`, writing its combined output to `log_path`.
    ///
    /// The log file is prepared before anything is spawned: if it cannot be
    /// created the run aborts with `IoError` and no process is started.
    /// A non-zero exit is reported as `RunOutcome::Failure`, not as an error.
    pub async fn run(&mut self, command: &BuiltCommand, log_path: &Path) -> Result<RunOutcome> {
        let mut log_file = FileSink::create(log_path).await?;

        info!(command = %command, log = %log_path.display(), "running commandlet");

        let process = self.launcher.launch(command)?;

        let mut sinks = FanOut::new()
            .with(&mut *self.echo)
            .with(&mut log_file);

        let supervise = async {
            let lines = pump_lines(process.lines, &mut sinks).await?;
            let code = process.exit.await?;
            Ok::<_, RunnerError>((lines, code))
        };

        let (lines, code) = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, supervise)
                .await
                .map_err(|_| {
                    warn!(timeout_secs = limit.as_secs(), "commandlet timed out, killing");
                    RunnerError::Timeout {
                        secs: limit.as_secs(),
                    }
                })??,
            None => supervise.await?,
        };

        let outcome = RunOutcome::from_exit_code(code, log_path.to_path_buf());
        if outcome.is_success() {
            info!(lines, log = %log_path.display(), "Command ran successfully");
        } else {
            warn!(exit_code = code, lines, log = %log_path.display(), "Process exit with exit code: {code}");
        }

        Ok(outcome)
    }
}

/// Drain `lines` into `sink` until the channel closes. Returns the count.
pub async fn pump_lines(
    mut lines: mpsc::Receiver<String>,
    sink: &mut dyn LineSink,
) -> Result<usize> {
    let mut count = 0usize;
    while let Some(line) = lines.recv().await {
        sink.write_line(&line).await?;
        count += 1;
    }
    Ok(count)
}
