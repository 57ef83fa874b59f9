//! `folio-config`: runtime configuration for the Folio backend.
//!
//! Provides:
//! - Typed config schema (server, model, persona, notification, sheet log)
//! - Environment + `.env` loading
//! - Default values
//! - Validation with errors and warnings
//! - Redaction for safe startup logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{from_env, from_vars, ConfigError};
pub use redact::redact;
pub use schema::{
    AgentConfig, FolioConfig, LoggingConfig, ModelConfig, PersonaConfig, PushoverConfig,
    ServerConfig, SheetsConfig, SheetsCredentials,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};

/// Load `.env`, read the process environment, and validate.
///
/// This is the main entry point for loading config at runtime.
pub fn load() -> Result<FolioConfig> {
    let config = read()?;
    check(&config)?;
    Ok(config)
}

/// Load `.env` and read the process environment without validating.
pub fn read() -> Result<FolioConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read .env file"),
    }

    Ok(from_env()?)
}

/// Log the validation report and fail on errors.
pub fn check(config: &FolioConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("configuration has {} error(s)", report.errors.len());
    }
    Ok(())
}
