// src/command/builder.rs

//! Turns a [`RunConfiguration`] plus a [`CommandletInvocation`] into the
//! engine command line.
//!
//! Token order is fixed:
//!
//! ```text
//! <engine_exe> <project_file> -run=<command> [<files>...] [-<flag>...] -LOG=<name> -UNATTENDED
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::command::invocation::{BuiltCommand, CommandletInvocation};
use crate::config::{CommandletSettings, RunConfiguration};
use crate::errors::{Result, RunnerError};

/// Keeps the engine from blocking on interactive prompts.
pub const UNATTENDED_FLAG: &str = "-UNATTENDED";

const PLATFORM_PLACEHOLDER: &str = "{platform}";

/// Absolute filesystem roots derived from `[environment]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub engine_root: PathBuf,
    pub project_root: PathBuf,
    pub artifacts_root: PathBuf,
}

/// Pure transformation from configuration to command lines.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    config: &'a RunConfiguration,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(config: &'a RunConfiguration) -> Self {
        Self { config }
    }

    /// Build the command for one invocation.
    ///
    /// Fails with `ConfigError` when the commandlet has no settings entry or
    /// when the engine/project roots do not exist.
    pub fn build(&self, invocation: &CommandletInvocation) -> Result<BuiltCommand> {
        let settings = self.settings_for(invocation.name())?;
        let paths = self.resolve_paths()?;

        let platform = self.platform_for(invocation, settings);
        let executable = self.editor_executable(&paths, platform);
        let project_file = self.project_file(&paths)?;

        let mut args = Vec::with_capacity(4 + invocation.input_files().len() + settings.flags.len());
        args.push(project_file.display().to_string());
        args.push(format!("-run={}", settings.command));

        for file in invocation.input_files() {
            args.push(absolute_file_arg(file)?);
        }

        args.extend(settings.flags.iter().map(|flag| format!("-{flag}")));

        args.push(format!("-LOG={}", log_file_name_for(invocation, settings)));
        args.push(UNATTENDED_FLAG.to_string());

        let command = BuiltCommand::new(executable, args);
        info!(
            commandlet = invocation.name(),
            platform,
            command = %command,
            "built commandlet command"
        );
        Ok(command)
    }

    /// Absolute path where this invocation's log is, or will be, written.
    ///
    /// Independent of whether the run has happened.
    pub fn target_log_file(&self, invocation: &CommandletInvocation) -> Result<PathBuf> {
        let settings = self.settings_for(invocation.name())?;
        let paths = self.resolve_paths()?;
        Ok(paths
            .artifacts_root
            .join(log_file_name_for(invocation, settings)))
    }

    /// Resolve `[environment]` roots to absolute paths.
    ///
    /// Engine and project roots must exist. The artifacts root is anchored
    /// on the project root and normalized without touching the filesystem,
    /// since the supervisor creates it on demand.
    pub fn resolve_paths(&self) -> Result<ResolvedPaths> {
        let env = &self.config.environment;
        let engine_root = canonical_root("engine_root", &env.engine_root)?;
        let project_root = canonical_root("project_root", &env.project_root)?;
        let artifacts_root = normalize_lexically(&project_root.join(&env.artifacts_root));

        debug!(
            engine_root = %engine_root.display(),
            project_root = %project_root.display(),
            artifacts_root = %artifacts_root.display(),
            "resolved environment paths"
        );

        Ok(ResolvedPaths {
            engine_root,
            project_root,
            artifacts_root,
        })
    }

    fn settings_for(&self, name: &str) -> Result<&'a CommandletSettings> {
        self.config.commandlet_settings(name).ok_or_else(|| {
            RunnerError::ConfigError(format!(
                "no [commandlet.{name}] settings entry in configuration"
            ))
        })
    }

    fn platform_for<'s>(
        &'s self,
        invocation: &'s CommandletInvocation,
        settings: &'s CommandletSettings,
    ) -> &'s str {
        invocation
            .platform_override()
            .or(settings.platform.as_deref())
            .unwrap_or(&self.config.engine_structure.default_platform)
    }

    fn editor_executable(&self, paths: &ResolvedPaths, platform: &str) -> PathBuf {
        let relative = self
            .config
            .engine_structure
            .editor_executable
            .replace(PLATFORM_PLACEHOLDER, platform);
        paths.engine_root.join(relative)
    }

    fn project_file(&self, paths: &ResolvedPaths) -> Result<PathBuf> {
        match &self.config.environment.project_file {
            Some(file) => Ok(paths.project_root.join(file)),
            None => {
                let dir_name = paths.project_root.file_name().ok_or_else(|| {
                    RunnerError::ConfigError(format!(
                        "cannot derive a project file name from '{}'; set [environment].project_file",
                        paths.project_root.display()
                    ))
                })?;
                let mut file_name = dir_name.to_os_string();
                file_name.push(".uproject");
                Ok(paths.project_root.join(file_name))
            }
        }
    }
}

/// Log file name precedence: invocation, commandlet setting, `<name>.log`.
pub fn log_file_name_for(invocation: &CommandletInvocation, settings: &CommandletSettings) -> String {
    invocation
        .log_file_name_override()
        .or(settings.log_file_name.as_deref().filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.log", invocation.name()))
}

fn canonical_root(key: &str, path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        RunnerError::ConfigError(format!(
            "[environment].{key} '{}' cannot be resolved: {e}",
            path.display()
        ))
    })
}

fn absolute_file_arg(file: &Path) -> Result<String> {
    let absolute = std::path::absolute(file).map_err(|e| RunnerError::io(file, e))?;
    Ok(absolute.display().to_string())
}

/// Collapse `.` and `..` components without consulting the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
