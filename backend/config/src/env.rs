//! Environment-variable configuration source.
//!
//! Every setting has a default except credentials. Blank values count as unset.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::defaults::PLACEHOLDER_API_KEY;
use crate::schema::{FolioConfig, PushoverConfig, SheetsConfig, SheetsCredentials};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Build the config from the process environment.
pub fn from_env() -> Result<FolioConfig, ConfigError> {
    from_vars(&std::env::vars().collect())
}

/// Build the config from a provided map (useful for testing).
pub fn from_vars(vars: &HashMap<String, String>) -> Result<FolioConfig, ConfigError> {
    let env = Vars(vars);
    let mut config = FolioConfig::default();

    if let Some(bind) = env.get("FOLIO_BIND") {
        config.server.bind_address = bind;
    }
    if let Some(port) = env.parse_first(&["FOLIO_PORT", "PORT"])? {
        config.server.port = port;
    }

    config.model.api_key = env
        .get("GOOGLE_API_KEY")
        .filter(|key| key != PLACEHOLDER_API_KEY);
    if let Some(model) = env.get("FOLIO_MODEL") {
        config.model.model = model;
    }
    if let Some(url) = env.get("FOLIO_MODEL_BASE_URL") {
        config.model.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = env.parse_first(&["FOLIO_MODEL_TIMEOUT_SECS"])? {
        config.model.timeout_secs = secs;
    }

    if let Some(rounds) = env.parse_first(&["FOLIO_MAX_TOOL_ROUNDS"])? {
        config.agent.max_tool_rounds = rounds;
    }
    if let Some(flag) = env.get("FOLIO_NOTIFY_EACH_MESSAGE") {
        config.agent.notify_each_message = parse_bool("FOLIO_NOTIFY_EACH_MESSAGE", &flag)?;
    }

    if let Some(name) = env.get("FOLIO_PERSONA_NAME") {
        config.persona.name = name;
    }
    if let Some(path) = env.get("FOLIO_SUMMARY_PATH") {
        config.persona.summary_path = PathBuf::from(path);
    }
    if let Some(path) = env.get("FOLIO_PROFILE_PATH") {
        config.persona.profile_path = PathBuf::from(path);
    }
    if let Some(url) = env.get("FOLIO_PROFILE_URL") {
        config.persona.profile_url = url;
    }

    if let (Some(token), Some(user)) = (env.get("PUSHOVER_TOKEN"), env.get("PUSHOVER_USER")) {
        let mut pushover = PushoverConfig {
            token,
            user,
            api_url: crate::defaults::DEFAULT_PUSHOVER_URL.to_string(),
        };
        if let Some(url) = env.get("FOLIO_PUSHOVER_URL") {
            pushover.api_url = url;
        }
        config.pushover = Some(pushover);
    }

    let credentials = env
        .get("GOOGLE_SHEETS_KEY_JSON")
        .map(SheetsCredentials::Inline)
        .or_else(|| {
            env.get("GOOGLE_SHEETS_CREDENTIALS")
                .map(|path| SheetsCredentials::File(PathBuf::from(path)))
        });
    if let (Some(credentials), Some(sheet_id)) = (credentials, env.get("GOOGLE_SHEET_ID")) {
        config.sheets = Some(SheetsConfig {
            sheet_id,
            range: env
                .get("FOLIO_SHEET_RANGE")
                .unwrap_or_else(|| crate::defaults::DEFAULT_SHEET_RANGE.to_string()),
            credentials,
        });
    }

    if let Some(level) = env.get("RUST_LOG") {
        config.logging.level = level;
    }
    config.logging.dir = env.get("FOLIO_LOG_DIR").map(PathBuf::from);

    Ok(config)
}

struct Vars<'a>(&'a HashMap<String, String>);

impl Vars<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Parse the first key that is present.
    fn parse_first<T>(&self, keys: &[&str]) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        for key in keys {
            if let Some(raw) = self.get(key) {
                return raw
                    .parse()
                    .map(Some)
                    .map_err(|e: T::Err| ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    });
            }
        }
        Ok(None)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_empty() {
        let config = from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.model.model, DEFAULT_MODEL);
        assert_eq!(config.model.timeout_secs, 30);
        assert!(config.model.api_key.is_none());
        assert!(config.pushover.is_none());
        assert!(config.sheets.is_none());
    }

    #[test]
    fn placeholder_api_key_counts_as_unset() {
        let config = from_vars(&env(&[("GOOGLE_API_KEY", "test_key_placeholder")])).unwrap();
        assert!(config.model.api_key.is_none());

        let config = from_vars(&env(&[("GOOGLE_API_KEY", "  ")])).unwrap();
        assert!(config.model.api_key.is_none());

        let config = from_vars(&env(&[("GOOGLE_API_KEY", "AIza-real")])).unwrap();
        assert_eq!(config.model.api_key.as_deref(), Some("AIza-real"));
    }

    #[test]
    fn pushover_requires_both_credentials() {
        let config = from_vars(&env(&[("PUSHOVER_TOKEN", "t")])).unwrap();
        assert!(config.pushover.is_none());

        let config = from_vars(&env(&[("PUSHOVER_TOKEN", "t"), ("PUSHOVER_USER", "u")])).unwrap();
        let pushover = config.pushover.unwrap();
        assert_eq!(pushover.user, "u");
        assert_eq!(pushover.api_url, DEFAULT_PUSHOVER_URL);
    }

    #[test]
    fn inline_sheet_key_wins_over_file() {
        let config = from_vars(&env(&[
            ("GOOGLE_SHEETS_KEY_JSON", "{\"type\":\"service_account\"}"),
            ("GOOGLE_SHEETS_CREDENTIALS", "/tmp/key.json"),
            ("GOOGLE_SHEET_ID", "sheet-123"),
        ]))
        .unwrap();
        let sheets = config.sheets.unwrap();
        assert!(matches!(sheets.credentials, SheetsCredentials::Inline(_)));
        assert_eq!(sheets.range, DEFAULT_SHEET_RANGE);
    }

    #[test]
    fn sheet_requires_id() {
        let config = from_vars(&env(&[("GOOGLE_SHEETS_CREDENTIALS", "/tmp/key.json")])).unwrap();
        assert!(config.sheets.is_none());
    }

    #[test]
    fn port_falls_back_to_port_var() {
        let config = from_vars(&env(&[("PORT", "9000")])).unwrap();
        assert_eq!(config.server.port, 9000);
        let config = from_vars(&env(&[("PORT", "9000"), ("FOLIO_PORT", "9100")])).unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn rejects_bad_numbers_and_flags() {
        let err = from_vars(&env(&[("FOLIO_MAX_TOOL_ROUNDS", "many")])).unwrap_err();
        assert!(err.to_string().contains("FOLIO_MAX_TOOL_ROUNDS"));
        assert!(from_vars(&env(&[("FOLIO_NOTIFY_EACH_MESSAGE", "maybe")])).is_err());
        let config = from_vars(&env(&[("FOLIO_NOTIFY_EACH_MESSAGE", "yes")])).unwrap();
        assert!(config.agent.notify_each_message);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = from_vars(&env(&[(
            "FOLIO_MODEL_BASE_URL",
            "https://generativelanguage.googleapis.com/v1beta/openai/",
        )]))
        .unwrap();
        assert!(!config.model.base_url.ends_with('/'));
    }
}
