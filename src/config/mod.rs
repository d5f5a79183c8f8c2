// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a single config file from disk (`loader.rs`).
//! - Validate basic invariants like non-empty commandlet keywords (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    CommandletSettings, EngineStructure, EnvironmentConfig, FailurePolicy, RawRunConfiguration,
    RunConfiguration, RunnerSection,
};
pub use validate::validate_config;
