//! Agent Event Logger
//!
//! Structured events (tool_call, message, error) emitted through `tracing`
//! on the `agent_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    ToolCall {
        tool_name: String,
        call_id: String,
        arguments_json: String,
    },
    Message {
        role: String,
        content: String,
    },
    Error {
        class: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AgentEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit one agent event for the given request.
    pub fn log_event(request_id: &str, event: AgentEvent) {
        let entry = Self::entry(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "agent_events", request_id = %entry.request_id, event = %json, "Agent trace event");
    }

    fn entry(request_id: &str, mut event: AgentEvent) -> EventLogEntry {
        match &mut event {
            AgentEvent::ToolCall { arguments_json, .. } => {
                *arguments_json = redact_sensitive_data(arguments_json);
            }
            AgentEvent::Message { content, .. } => {
                *content = redact_sensitive_data(content);
            }
            AgentEvent::Error { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }

        EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_redacted_and_tagged() {
        let entry = EventLogger::entry(
            "req-1",
            AgentEvent::ToolCall {
                tool_name: "record_user_details".into(),
                call_id: "call_1".into(),
                arguments_json: "{\"email\":\"x@y.com\"}".into(),
            },
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["event"]["type"], "tool_call");
        assert!(!value.to_string().contains("x@y.com"));
    }
}
