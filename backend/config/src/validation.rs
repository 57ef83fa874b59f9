//! Config validation: errors block startup, warnings are logged.

use crate::schema::{FolioConfig, SheetsCredentials};
use thiserror::Error;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All findings from one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FolioConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_model(config, &mut report);
    validate_agent(config, &mut report);
    validate_persona(config, &mut report);
    validate_side_channels(config, &mut report);
    report
}

fn validate_model(config: &FolioConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if model.api_key.is_none() {
        report.warn(
            "model.apiKey",
            "GOOGLE_API_KEY is not set; /ask will apologise and /health will fail",
        );
    }
    if model.model.trim().is_empty() {
        report.error("model.model", "Model name cannot be empty");
    }
    if !model.base_url.starts_with("http://") && !model.base_url.starts_with("https://") {
        report.error("model.baseUrl", "Base URL must be an http(s) URL");
    }
    if model.timeout_secs == 0 {
        report.error("model.timeoutSecs", "Timeout must be at least one second");
    }
}

fn validate_agent(config: &FolioConfig, report: &mut ValidationReport) {
    if config.agent.max_tool_rounds == 0 {
        report.error("agent.maxToolRounds", "At least one tool round is required");
    }
}

fn validate_persona(config: &FolioConfig, report: &mut ValidationReport) {
    let persona = &config.persona;
    if persona.name.trim().is_empty() {
        report.error("persona.name", "Persona name cannot be empty");
    }
    if !persona.summary_path.exists() {
        report.warn(
            "persona.summaryPath",
            format!("{} not found; a placeholder summary will be used", persona.summary_path.display()),
        );
    }
    if !persona.profile_path.exists() {
        report.warn(
            "persona.profilePath",
            format!("{} not found; a placeholder profile will be used", persona.profile_path.display()),
        );
    }
}

fn validate_side_channels(config: &FolioConfig, report: &mut ValidationReport) {
    if config.pushover.is_none() {
        report.warn("pushover", "Pushover credentials not configured; notifications are skipped");
    }
    match &config.sheets {
        None => report.warn("sheets", "Google Sheets not configured; exchanges are not recorded"),
        Some(sheets) => {
            if let SheetsCredentials::File(path) = &sheets.credentials {
                if !path.exists() {
                    report.warn(
                        "sheets.credentials",
                        format!("{} not found; sheet appends will fail", path.display()),
                    );
                }
            }
            if !sheets.range.contains('!') {
                report.warn("sheets.range", "Range has no sheet name, e.g. 'Sheet1!A:C'");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_with_warnings() {
        let report = validate(&FolioConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "model.apiKey"));
        assert!(report.warnings.iter().any(|w| w.path == "pushover"));
    }

    #[test]
    fn zero_limits_are_errors() {
        let mut config = FolioConfig::default();
        config.agent.max_tool_rounds = 0;
        config.model.timeout_secs = 0;
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn non_http_base_url_is_an_error() {
        let mut config = FolioConfig::default();
        config.model.base_url = "generativelanguage.googleapis.com".into();
        let report = validate(&config);
        assert!(report.errors.iter().any(|e| e.path == "model.baseUrl"));
    }
}
