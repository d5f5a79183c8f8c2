// src/command/invocation.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// One requested commandlet run.
///
/// Created per run and discarded once the process completes. Every field
/// is owned by the invocation, so nothing leaks between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandletInvocation {
    name: String,
    platform: Option<String>,
    files: Vec<PathBuf>,
    log_file_name: Option<String>,
}

impl CommandletInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: None,
            files: Vec::new(),
            log_file_name: None,
        }
    }

    /// Target platform; falls back to the commandlet's or the engine default.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Replace the input file list.
    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single input file.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Log file name under the artifacts root. An empty name means "default".
    pub fn log_file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.log_file_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform_override(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn log_file_name_override(&self) -> Option<&str> {
        self.log_file_name.as_deref()
    }
}

/// A fully formed command line: the program plus its ordered arguments.
///
/// Consumed immediately by the supervisor; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl BuiltCommand {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A `tokio` command for the program and its args, without a shell.
    ///
    /// Stdio and other process options are left to the caller.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Space-joined command line, used for logging and `--dry-run`.
impl fmt::Display for BuiltCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
