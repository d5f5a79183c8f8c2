// src/config/validate.rs

use crate::config::model::{RawRunConfiguration, RunConfiguration};
use crate::errors::{Result, RunnerError};

impl TryFrom<RawRunConfiguration> for RunConfiguration {
    type Error = crate::errors::RunnerError;

    fn try_from(raw: RawRunConfiguration) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(RunConfiguration::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawRunConfiguration) -> Result<()> {
    validate_environment(cfg)?;
    validate_engine_structure(cfg)?;
    validate_commandlets(cfg)?;
    validate_runner(cfg)?;
    Ok(())
}

fn validate_environment(cfg: &RawRunConfiguration) -> Result<()> {
    let env = &cfg.environment;
    let required = [
        ("engine_root", &env.engine_root),
        ("project_root", &env.project_root),
        ("artifacts_root", &env.artifacts_root),
    ];

    for (key, value) in required {
        if value.as_os_str().is_empty() {
            return Err(RunnerError::ConfigError(format!(
                "[environment].{key} must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_engine_structure(cfg: &RawRunConfiguration) -> Result<()> {
    if cfg.engine_structure.editor_executable.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "[engine_structure].editor_executable must not be empty".to_string(),
        ));
    }
    if cfg.engine_structure.default_platform.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "[engine_structure].default_platform must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_commandlets(cfg: &RawRunConfiguration) -> Result<()> {
    for (name, settings) in cfg.commandlet.iter() {
        if settings.command.trim().is_empty() {
            return Err(RunnerError::ConfigError(format!(
                "commandlet '{name}' has an empty `command`"
            )));
        }
        if let Some(flag) = settings.flags.iter().find(|f| f.trim().is_empty()) {
            return Err(RunnerError::ConfigError(format!(
                "commandlet '{name}' has an empty flag ({flag:?}) in `flags`"
            )));
        }
    }
    Ok(())
}

fn validate_runner(cfg: &RawRunConfiguration) -> Result<()> {
    if cfg.runner.timeout_secs == Some(0) {
        return Err(RunnerError::ConfigError(
            "[runner].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Convenience wrapper: validate an already-deserialized raw config.
pub fn validate_config(raw: RawRunConfiguration) -> Result<RunConfiguration> {
    RunConfiguration::try_from(raw)
}
