use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;
use crate::tools::ToolSchema;

/// A chat-completions backend able to request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name used in logs (e.g., "gemini").
    fn name(&self) -> &str;

    /// Submit the transcript and return the model's next turn.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;
}

/// Request to a chat model.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// Callable schemas; empty means tool calling is not offered.
    pub tools: Vec<ToolSchema>,
}

/// One model turn.
#[derive(Debug, Clone)]
pub struct Completion {
    pub message: ChatMessage,
    pub finish_reason: FinishReason,
}

/// Why the model stopped producing this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
    ContentFilter,
    #[serde(untagged)]
    Other(String),
}

impl FinishReason {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("stop") | None => FinishReason::Stop,
            Some("tool_calls") => FinishReason::ToolCalls,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(other) => FinishReason::Other(other.to_string()),
        }
    }
}

/// A server-side callback the model may invoke mid-conversation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g., "record_user_details").
    fn name(&self) -> &str;

    /// Description the model uses to decide when to call the tool.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool with already-decoded JSON arguments.
    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value>;
}

/// Outbound push notification collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, text: &str) -> Result<()>;
}

/// Append-only log of completed visitor exchanges.
#[async_trait]
pub trait ExchangeLog: Send + Sync {
    fn name(&self) -> &str;

    async fn append(&self, timestamp: &str, message: &str, answer: &str) -> Result<()>;
}
