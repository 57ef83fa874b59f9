//! Folio runtime configuration schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::*;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolioConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub persona: PersonaConfig,
    /// Push notifications; `None` disables them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover: Option<PushoverConfig>,
    /// Spreadsheet exchange log; `None` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<SheetsConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

/// Chat-completions backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// `None` when unset; every model call then fails with a config error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub max_tool_rounds: usize,
    /// Push every incoming visitor message as a notification.
    pub notify_each_message: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaConfig {
    pub name: String,
    pub summary_path: PathBuf,
    pub profile_path: PathBuf,
    /// Public page visitors are pointed to from `GET /`.
    pub profile_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushoverConfig {
    pub token: String,
    pub user: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsConfig {
    pub sheet_id: String,
    pub range: String,
    pub credentials: SheetsCredentials,
}

/// Where the service-account key comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "source", content = "value")]
pub enum SheetsCredentials {
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling JSON logs; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: DEFAULT_BIND.to_string(),
                port: DEFAULT_PORT,
            },
            model: ModelConfig {
                api_key: None,
                base_url: DEFAULT_MODEL_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            },
            agent: AgentConfig {
                max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
                notify_each_message: false,
            },
            persona: PersonaConfig {
                name: DEFAULT_PERSONA_NAME.to_string(),
                summary_path: PathBuf::from(DEFAULT_SUMMARY_PATH),
                profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
                profile_url: DEFAULT_PROFILE_URL.to_string(),
            },
            pushover: None,
            sheets: None,
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                dir: None,
            },
        }
    }
}
