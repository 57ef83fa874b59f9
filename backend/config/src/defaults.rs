//! Default values applied when a setting is absent from the environment.

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7860;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// Tool-calling rounds allowed before the reply is degraded.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

pub const DEFAULT_PERSONA_NAME: &str = "Sandeep Patel";
pub const DEFAULT_SUMMARY_PATH: &str = "me/summary.txt";
pub const DEFAULT_PROFILE_PATH: &str = "me/linkedin.pdf";
pub const DEFAULT_PROFILE_URL: &str = "https://huggingface.co/spaces/sandeep-patel/personal-profile";

pub const DEFAULT_PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

/// Column range rows are appended to: timestamp, message, answer.
pub const DEFAULT_SHEET_RANGE: &str = "Sheet1!A:C";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Placeholder API key value shipped in sample `.env` files; treated as unset.
pub const PLACEHOLDER_API_KEY: &str = "test_key_placeholder";
