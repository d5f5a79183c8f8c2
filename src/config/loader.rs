// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawRunConfiguration, RunConfiguration};
use crate::errors::{Result, RunnerError};

/// Load a configuration file from a given path and return the raw
/// `RawRunConfiguration`.
///
/// This only performs TOML deserialization; it does **not** validate or
/// resolve paths. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawRunConfiguration> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        RunnerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
    })?;

    let config: RawRunConfiguration = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, resolve relative roots and validate.
///
/// - Reads TOML from exactly this one file.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Makes a relative `engine_root` / `project_root` relative to the
///   directory holding the config file rather than the working directory.
/// - Runs the checks in `config::validate`.
///
/// Existence of the roots is checked later, when a command is built.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RunConfiguration> {
    let path = path.as_ref();
    let mut raw_config = load_from_path(path)?;

    let base = config_dir(path);
    raw_config.environment.engine_root = anchor(&base, &raw_config.environment.engine_root);
    raw_config.environment.project_root = anchor(&base, &raw_config.environment.project_root);

    debug!(
        config = %path.display(),
        engine_root = %raw_config.environment.engine_root.display(),
        project_root = %raw_config.environment.project_root.display(),
        "loaded run configuration"
    );

    RunConfiguration::try_from(raw_config)
}

/// Config path used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Commandlets.toml")
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_keeps_absolute_paths() {
        let abs = if cfg!(windows) { "C:\\engine" } else { "/engine" };
        assert_eq!(anchor(Path::new("cfg"), Path::new(abs)), PathBuf::from(abs));
    }

    #[test]
    fn anchor_joins_relative_paths_onto_config_dir() {
        assert_eq!(
            anchor(Path::new("cfg"), Path::new("../Project")),
            Path::new("cfg").join("../Project")
        );
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        assert_eq!(config_dir(Path::new("Commandlets.toml")), PathBuf::from("."));
    }
}
