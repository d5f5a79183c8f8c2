// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [environment]
/// engine_root = "../UnrealEngine"
/// project_root = "../MyGame"
/// artifacts_root = "Saved/Commandlets"
///
/// [engine_structure]
/// editor_executable = "Engine/Binaries/{platform}/UE4Editor-Cmd.exe"
/// default_platform = "Win64"
///
/// [commandlet.PackageInfo]
/// command = "PkgInfo"
/// flags = ["nullrhi", "stdout"]
///
/// [runner]
/// on_failure = "exit"
/// ```
///
/// This is the unvalidated shape; use [`RunConfiguration`] (obtained via
/// `TryFrom`) everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRunConfiguration {
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub engine_structure: EngineStructure,

    /// Keyed by commandlet name, e.g. `"PackageInfo"`.
    #[serde(default)]
    pub commandlet: BTreeMap<String, CommandletSettings>,

    #[serde(default)]
    pub runner: RunnerSection,
}

/// A validated, read-only run configuration.
///
/// The core never mutates this; each invocation only reads from it.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub environment: EnvironmentConfig,
    pub engine_structure: EngineStructure,
    pub commandlet: BTreeMap<String, CommandletSettings>,
    pub runner: RunnerSection,
}

impl RunConfiguration {
    /// Construct without running validation. Callers are expected to have
    /// validated `raw` already (see `config::validate`).
    pub(crate) fn new_unchecked(raw: RawRunConfiguration) -> Self {
        Self {
            environment: raw.environment,
            engine_structure: raw.engine_structure,
            commandlet: raw.commandlet,
            runner: raw.runner,
        }
    }

    /// Look up the settings for a commandlet by name.
    pub fn commandlet_settings(&self, name: &str) -> Option<&CommandletSettings> {
        self.commandlet.get(name)
    }
}

/// `[environment]` section: filesystem roots of the engine and project.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Root of the engine installation. Must exist.
    pub engine_root: PathBuf,

    /// Root of the project being processed. Must exist.
    pub project_root: PathBuf,

    /// Where raw commandlet logs are written, relative to `project_root`
    /// unless absolute.
    pub artifacts_root: PathBuf,

    /// Project file name relative to `project_root`.
    ///
    /// If `None`, `<project dir name>.uproject` is assumed.
    #[serde(default)]
    pub project_file: Option<PathBuf>,
}

/// `[engine_structure]` section: layout of the engine installation.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineStructure {
    /// Editor executable relative to `engine_root`. `{platform}` is replaced
    /// with the invocation's target platform.
    #[serde(default = "default_editor_executable")]
    pub editor_executable: String,

    #[serde(default = "default_platform")]
    pub default_platform: String,
}

fn default_editor_executable() -> String {
    "Engine/Binaries/{platform}/UE4Editor-Cmd.exe".to_string()
}

fn default_platform() -> String {
    "Win64".to_string()
}

impl Default for EngineStructure {
    fn default() -> Self {
        Self {
            editor_executable: default_editor_executable(),
            default_platform: default_platform(),
        }
    }
}

/// `[commandlet.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandletSettings {
    /// Keyword passed as `-run=<command>`.
    pub command: String,

    /// Extra flags, each emitted as `-<flag>` in order.
    #[serde(default)]
    pub flags: Vec<String>,

    /// Overrides the default `<name>.log` log file name.
    #[serde(default)]
    pub log_file_name: Option<String>,

    /// Overrides `engine_structure.default_platform` for this commandlet.
    #[serde(default)]
    pub platform: Option<String>,
}

/// `[runner]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerSection {
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Kill the child and abort if it runs longer than this.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// What to do when the commandlet exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Surface the failure as an error so the tool exits with the child's code.
    #[default]
    Exit,
    /// Return the failure as a regular outcome and let the caller decide.
    Report,
}
