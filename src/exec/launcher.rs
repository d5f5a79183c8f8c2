// src/exec/launcher.rs

//! Pluggable process launcher abstraction.
//!
//! The supervisor talks to a `ProcessLauncher` instead of spawning
//! `tokio::process::Command` directly. This makes it easy to swap in a fake
//! process in tests while keeping the production spawning code here.
//!
//! A launched process is represented by a [`SpawnedProcess`]: a channel of
//! already-decoded output lines (stdout and stderr merged) plus a future
//! resolving to the exit code.

use std::future::Future;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::BuiltCommand;
use crate::errors::{Result, RunnerError};

/// Upper bound on lines buffered between the reader and the sinks.
///
/// The reader waits when this fills up, so memory stays bounded no matter how
/// much the child prints.
pub const LINE_CHANNEL_CAPACITY: usize = 256;

pub type ExitFuture = Pin<Box<dyn Future<Output = Result<i32>> + Send>>;

/// A running child process as seen by the supervisor.
pub struct SpawnedProcess {
    /// Combined output lines. Closes once the output pipe hits EOF.
    pub lines: mpsc::Receiver<String>,

    /// Resolves to the exit code once the child terminates (`-1` when it
    /// was killed by a signal). Dropping it kills the child.
    pub exit: ExitFuture,
}

/// Trait abstracting how a built command is started.
///
/// Production code uses [`TokioLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessLauncher: Send + Sync {
    /// Start `command`. Must be called from within a Tokio runtime.
    fn launch(&self, command: &BuiltCommand) -> Result<SpawnedProcess>;
}

/// Real launcher: spawns the program directly (no shell). stdout and stderr
/// share one OS pipe, so lines arrive in the order the child wrote them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    fn launch(&self, command: &BuiltCommand) -> Result<SpawnedProcess> {
        let program = command.program().to_path_buf();
        let pipe_error = |source| RunnerError::LaunchError {
            program: program.clone(),
            source,
        };

        let (reader, writer) = std::io::pipe().map_err(pipe_error)?;
        let stderr_writer = writer.try_clone().map_err(pipe_error)?;

        let mut cmd = command.to_command();
        cmd.stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer)
            .kill_on_drop(true);

        let spawned = cmd.spawn();
        // `cmd` still owns the write ends; the reader only sees EOF once
        // the child holds the last copies.
        drop(cmd);
        let mut child = spawned.map_err(pipe_error)?;

        debug!(program = %program.display(), pid = ?child.id(), "spawned child process");

        let (tx, rx) = mpsc::channel::<String>(LINE_CHANNEL_CAPACITY);
        tokio::task::spawn_blocking(move || forward_lines(reader, tx));

        let exit: ExitFuture = Box::pin(async move {
            let status = child
                .wait()
                .await
                .map_err(|e| wait_error(program, e))?;
            Ok(status.code().unwrap_or(-1))
        });

        Ok(SpawnedProcess { lines: rx, exit })
    }
}

fn wait_error(program: PathBuf, source: std::io::Error) -> RunnerError {
    RunnerError::LaunchError { program, source }
}

/// Read `stream` line by line and forward each decoded line.
///
/// Runs on a blocking thread. Bytes are decoded as UTF-8 (lossily) per line
/// and trailing whitespace, including `\r`, is stripped. A final line
/// without a newline is still forwarded.
fn forward_lines<R: Read>(stream: R, tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if tx.blocking_send(decode_line(&buf)).is_err() {
                    debug!("line receiver dropped; stop reading");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed reading child output");
                break;
            }
        }
    }
}

pub(crate) fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end().to_string()
}
