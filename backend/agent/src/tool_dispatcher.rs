//! Dispatcher for model tool calls.
//!
//! Decodes each call's JSON arguments, routes it through the registry, and
//! wraps the result as a tool message carrying the original call id.

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use folio_core::{ChatMessage, FolioError, ToolCall, ToolRegistry, ToolSchema};
use folio_logging::{AgentEvent, EventLogger};

pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.registry.schemas()
    }

    /// Execute one call and produce its tool-result message.
    pub async fn execute(&self, request_id: &str, call: &ToolCall) -> Result<ChatMessage> {
        let name = &call.function.name;
        info!(tool = %name, call_id = %call.id, "Tool called");
        EventLogger::log_event(
            request_id,
            AgentEvent::ToolCall {
                tool_name: name.clone(),
                call_id: call.id.clone(),
                arguments_json: call.function.arguments.clone(),
            },
        );

        let args = parse_arguments(call)?;
        let result = self.registry.dispatch(name, args).await?;
        Ok(ChatMessage::tool_result(
            call.id.clone(),
            serde_json::to_string(&result)?,
        ))
    }

    /// Execute calls sequentially, in the order the model listed them.
    pub async fn execute_all(&self, request_id: &str, calls: &[ToolCall]) -> Result<Vec<ChatMessage>> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(request_id, call).await?);
        }
        Ok(results)
    }
}

/// Blank argument strings count as an empty object.
fn parse_arguments(call: &ToolCall) -> Result<Value, FolioError> {
    let raw = call.function.arguments.trim();
    if raw.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|e| FolioError::ToolArguments {
        tool: call.function.name.clone(),
        message: format!("arguments are not valid JSON: {e}"),
    })
}
