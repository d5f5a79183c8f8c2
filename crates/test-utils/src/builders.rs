#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use commandlet_runner::config::{
    CommandletSettings, EngineStructure, EnvironmentConfig, FailurePolicy, RawRunConfiguration,
    RunConfiguration, RunnerSection,
};
use tempfile::TempDir;

/// Builder for `RunConfiguration` to simplify test setup.
pub struct RunConfigurationBuilder {
    config: RawRunConfiguration,
}

impl RunConfigurationBuilder {
    pub fn new(engine_root: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            config: RawRunConfiguration {
                environment: EnvironmentConfig {
                    engine_root: engine_root.into(),
                    project_root: project_root.into(),
                    artifacts_root: PathBuf::from("Saved/Commandlets"),
                    project_file: None,
                },
                engine_structure: EngineStructure::default(),
                commandlet: BTreeMap::new(),
                runner: RunnerSection::default(),
            },
        }
    }

    pub fn artifacts_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.environment.artifacts_root = path.into();
        self
    }

    pub fn project_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.environment.project_file = Some(path.into());
        self
    }

    pub fn editor_executable(mut self, relative: &str) -> Self {
        self.config.engine_structure.editor_executable = relative.to_string();
        self
    }

    pub fn default_platform(mut self, platform: &str) -> Self {
        self.config.engine_structure.default_platform = platform.to_string();
        self
    }

    pub fn with_commandlet(mut self, name: &str, settings: CommandletSettings) -> Self {
        self.config.commandlet.insert(name.to_string(), settings);
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.runner.on_failure = policy;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.runner.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> RunConfiguration {
        RunConfiguration::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for `CommandletSettings`.
pub struct CommandletSettingsBuilder {
    settings: CommandletSettings,
}

impl CommandletSettingsBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            settings: CommandletSettings {
                command: command.to_string(),
                flags: vec![],
                log_file_name: None,
                platform: None,
            },
        }
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.settings.flags.push(flag.to_string());
        self
    }

    pub fn log_file_name(mut self, name: &str) -> Self {
        self.settings.log_file_name = Some(name.to_string());
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.settings.platform = Some(platform.to_string());
        self
    }

    pub fn build(self) -> CommandletSettings {
        self.settings
    }
}

/// Throwaway engine + project directory pair on disk.
///
/// Layout:
/// ```text
/// <tmp>/Engine/
/// <tmp>/MyGame/MyGame.uproject
/// ```
pub struct ScratchProject {
    dir: TempDir,
}

impl ScratchProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("Engine")).expect("create engine root");
        fs::create_dir_all(dir.path().join("MyGame")).expect("create project root");
        fs::write(dir.path().join("MyGame").join("MyGame.uproject"), "{}")
            .expect("write project file");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn engine_root(&self) -> PathBuf {
        self.dir.path().join("Engine")
    }

    pub fn project_root(&self) -> PathBuf {
        self.dir.path().join("MyGame")
    }

    /// A config builder pointing at this scratch layout.
    pub fn config(&self) -> RunConfigurationBuilder {
        RunConfigurationBuilder::new(self.engine_root(), self.project_root())
    }
}

impl Default for ScratchProject {
    fn default() -> Self {
        Self::new()
    }
}
