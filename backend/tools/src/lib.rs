pub mod contact;
pub mod unknown_question;

pub use contact::RecordUserDetailsTool;
pub use unknown_question::RecordUnknownQuestionTool;

use std::sync::Arc;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use folio_channels::Outbox;
use folio_core::{FolioError, ToolRegistry};

/// Tools the persona prompt refers to; each must have an implementation.
pub const DECLARED_TOOLS: &[&str] = &["record_user_details", "record_unknown_question"];

/// The only payload either callback returns.
pub fn recorded_ok() -> Value {
    json!({ "recorded": "ok" })
}

/// Registry with both callbacks, checked against [`DECLARED_TOOLS`].
pub fn builtin_registry(outbox: Outbox) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(RecordUserDetailsTool::new(outbox.clone())));
    registry.register(Arc::new(RecordUnknownQuestionTool::new(outbox)));
    registry.ensure_declared(DECLARED_TOOLS)?;
    Ok(registry)
}

/// Push `text` and log it as a row tagged with the tool name.
fn record(outbox: &Outbox, tool: &str, text: String) {
    outbox.record_exchange(tool, text.as_str());
    outbox.notify(text);
}

fn decode_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, FolioError> {
    serde_json::from_value(args).map_err(|e| FolioError::ToolArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_channels::{RecordingExchangeLog, RecordingNotifier};

    #[tokio::test]
    async fn builtin_registry_offers_both_tools_in_order() {
        let (outbox, _worker) = Outbox::spawn(
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingExchangeLog::new()),
        );
        let registry = builtin_registry(outbox).unwrap();
        let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, DECLARED_TOOLS);
    }

    #[tokio::test]
    async fn schemas_are_closed_objects() {
        let (outbox, _worker) = Outbox::spawn(
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingExchangeLog::new()),
        );
        let registry = builtin_registry(outbox).unwrap();
        for schema in registry.schemas() {
            assert_eq!(schema.parameters["type"], "object");
            assert_eq!(schema.parameters["additionalProperties"], false);
            assert!(schema.parameters["required"].is_array());
            assert!(!schema.description.is_empty());
        }
    }
}
