use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the Folio backend.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("model backend error ({provider}): {message}")]
    Network { provider: String, message: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("malformed arguments for tool `{tool}`: {message}")]
    ToolArguments { tool: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure classes reported at the chat boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Config,
    Network,
    Parsing,
    Internal,
}

impl FolioError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FolioError::Config(_) => ErrorClass::Config,
            FolioError::Network { .. } => ErrorClass::Network,
            FolioError::MalformedResponse(_) | FolioError::ToolArguments { .. } => {
                ErrorClass::Parsing
            }
            FolioError::Other(_) => ErrorClass::Internal,
        }
    }
}

impl ErrorClass {
    /// Classify an arbitrary error chain, looking for a `FolioError` first.
    pub fn of(err: &anyhow::Error) -> Self {
        if let Some(folio) = err.downcast_ref::<FolioError>() {
            return folio.class();
        }
        if err.downcast_ref::<serde_json::Error>().is_some() {
            return ErrorClass::Parsing;
        }
        ErrorClass::Internal
    }
}
