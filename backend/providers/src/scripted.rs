//! A chat model that replays a fixed script of turns.
//!
//! Used as the model backend in tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use folio_core::{
    ChatMessage, ChatModel, Completion, CompletionRequest, ErrorClass, FinishReason, FolioError,
    ToolCall,
};

/// One scripted model turn.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Final assistant answer.
    Reply(String),
    /// Assistant turn requesting tool calls.
    ToolCalls(Vec<ToolCall>),
    /// The call fails with an error of the given class.
    Fail(ErrorClass, String),
}

pub struct ScriptedModel {
    name: String,
    steps: Mutex<VecDeque<ScriptedStep>>,
    /// Played once the script runs out.
    repeat: Option<ScriptedStep>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            steps: Mutex::new(VecDeque::new()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(ScriptedStep::Reply(text.into()))
    }

    pub fn then_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.push(ScriptedStep::ToolCalls(calls))
    }

    pub fn then_fail(self, class: ErrorClass, message: impl Into<String>) -> Self {
        self.push(ScriptedStep::Fail(class, message.into()))
    }

    /// Keep playing `step` after the script is exhausted.
    pub fn repeating(mut self, step: ScriptedStep) -> Self {
        self.repeat = Some(step);
        self
    }

    fn push(self, step: ScriptedStep) -> Self {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(step);
        self
    }

    /// Number of `complete` invocations so far.
    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn next_step(&self) -> Option<ScriptedStep> {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .or_else(|| self.repeat.clone())
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(class: ErrorClass, message: String) -> FolioError {
    match class {
        ErrorClass::Config => FolioError::Config(message),
        ErrorClass::Network => FolioError::Network {
            provider: "scripted".to_string(),
            message,
        },
        ErrorClass::Parsing => FolioError::MalformedResponse(message),
        ErrorClass::Internal => FolioError::Other(anyhow::anyhow!(message)),
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        match self.next_step() {
            Some(ScriptedStep::Reply(text)) => Ok(Completion {
                message: ChatMessage::assistant(text),
                finish_reason: FinishReason::Stop,
            }),
            Some(ScriptedStep::ToolCalls(calls)) => Ok(Completion {
                message: ChatMessage::assistant_tool_calls(None, calls),
                finish_reason: FinishReason::ToolCalls,
            }),
            Some(ScriptedStep::Fail(class, message)) => Err(failure(class, message).into()),
            None => Err(FolioError::MalformedResponse("script exhausted".into()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_steps_in_order() {
        let model = ScriptedModel::new()
            .then_tool_calls(vec![ToolCall::new("c1", "record_unknown_question", "{}")])
            .then_reply("done");

        let request = CompletionRequest::default();
        let first = model.complete(&request).await.unwrap();
        assert_eq!(first.finish_reason, FinishReason::ToolCalls);
        let second = model.complete(&request).await.unwrap();
        assert_eq!(second.message.text(), "done");
        assert!(model.complete(&request).await.is_err());
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn scripted_failures_keep_their_class() {
        let model = ScriptedModel::new().then_fail(ErrorClass::Network, "connection reset");
        let err = model.complete(&CompletionRequest::default()).await.unwrap_err();
        assert_eq!(ErrorClass::of(&err), ErrorClass::Network);
    }

    #[tokio::test]
    async fn repeating_step_never_runs_out() {
        let model = ScriptedModel::new().repeating(ScriptedStep::Reply("again".into()));
        for _ in 0..3 {
            let turn = model.complete(&CompletionRequest::default()).await.unwrap();
            assert_eq!(turn.message.text(), "again");
        }
    }
}
