use std::sync::{Arc, Mutex};

use commandlet_runner::command::BuiltCommand;
use commandlet_runner::errors::{Result, RunnerError};
use commandlet_runner::exec::{LineSink, ProcessLauncher, SinkFuture, SpawnedProcess};
use tokio::sync::mpsc;

/// A fake launcher that:
/// - records every command it was asked to launch
/// - "prints" a scripted list of lines, then exits with a scripted code.
#[derive(Clone)]
pub struct FakeLauncher {
    lines: Vec<String>,
    exit_code: i32,
    fail_launch: bool,
    launched: Arc<Mutex<Vec<BuiltCommand>>>,
}

impl FakeLauncher {
    pub fn new<I, S>(lines: I, exit_code: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit_code,
            fail_launch: false,
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A launcher whose every `launch` fails as if the binary were missing.
    pub fn missing_binary() -> Self {
        let mut launcher = Self::new(Vec::<String>::new(), 0);
        launcher.fail_launch = true;
        launcher
    }

    pub fn launched(&self) -> Vec<BuiltCommand> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, command: &BuiltCommand) -> Result<SpawnedProcess> {
        self.launched.lock().unwrap().push(command.clone());

        if self.fail_launch {
            return Err(RunnerError::LaunchError {
                program: command.program().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake: no such binary"),
            });
        }

        let (tx, rx) = mpsc::channel(8);
        let lines = self.lines.clone();
        tokio::spawn(async move {
            for line in lines {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        let code = self.exit_code;
        Ok(SpawnedProcess {
            lines: rx,
            exit: Box::pin(async move { Ok(code) }),
        })
    }
}

/// Sink that keeps every line in memory, shared with the test.
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn write_line<'a>(&'a mut self, line: &'a str) -> SinkFuture<'a> {
        let lines = Arc::clone(&self.lines);
        let line = line.to_string();
        Box::pin(async move {
            lines.lock().unwrap().push(line);
            Ok(())
        })
    }
}
