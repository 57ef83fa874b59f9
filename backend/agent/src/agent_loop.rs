//! Core agent execution loop.
//!
//! One request runs `AWAITING_MODEL → (TOOL_REQUESTED → TOOLS_EXECUTED →
//! AWAITING_MODEL)* → DONE` over a fresh transcript. Failures never escape:
//! they become a [`ChatOutcome`] the HTTP layer can render as-is.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use folio_channels::Outbox;
use folio_core::{
    ChatMessage, ChatModel, CompletionRequest, ErrorClass, FinishReason, ToolRegistry,
};
use folio_logging::{AgentEvent, EventLogger};

use crate::persona::Persona;
use crate::system_prompt::PromptBuilder;
use crate::tool_dispatcher::ToolDispatcher;
use crate::transcript::Transcript;

/// Reply shown to the visitor whenever the turn failed.
pub const APOLOGY: &str =
    "I'm sorry, I'm experiencing technical difficulties right now. Please try again in a moment.";

/// Reply shown when the model keeps requesting tools past the round limit.
pub const DEGRADED_REPLY: &str =
    "I wasn't able to finish answering that one. Could you try asking it another way?";

const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// How a chat turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The model produced a final answer.
    Answer(String),
    /// The tool-round ceiling was hit before a final answer.
    Degraded { text: String, rounds: usize },
    /// The turn failed; the visitor only sees the apology.
    Failed { class: ErrorClass },
}

impl ChatOutcome {
    /// Visitor-facing text.
    pub fn reply(&self) -> &str {
        match self {
            ChatOutcome::Answer(text) => text.as_str(),
            ChatOutcome::Degraded { text, .. } => text.as_str(),
            ChatOutcome::Failed { .. } => APOLOGY,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChatOutcome::Answer(_) => "answer",
            ChatOutcome::Degraded { .. } => "degraded",
            ChatOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, ChatOutcome::Answer(_))
    }
}

enum LoopEnd {
    Answer(String),
    Exhausted(usize),
}

/// The persona agent. Built once at startup and shared across requests.
pub struct ProfileAgent {
    system_prompt: ChatMessage,
    model: Arc<dyn ChatModel>,
    dispatcher: ToolDispatcher,
    outbox: Outbox,
    max_tool_rounds: usize,
    notify_each_message: bool,
}

impl ProfileAgent {
    pub fn new(
        persona: &Persona,
        model: Arc<dyn ChatModel>,
        registry: ToolRegistry,
        outbox: Outbox,
    ) -> Self {
        Self {
            system_prompt: PromptBuilder::build(persona),
            model,
            dispatcher: ToolDispatcher::new(registry),
            outbox,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            notify_each_message: false,
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Push every incoming visitor message as a notification as well.
    pub fn with_message_notifications(mut self, enabled: bool) -> Self {
        self.notify_each_message = enabled;
        self
    }

    pub fn system_prompt(&self) -> &ChatMessage {
        &self.system_prompt
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Answer one visitor message given the prior conversation.
    pub async fn chat(&self, message: &str, history: Vec<ChatMessage>) -> ChatOutcome {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("chat", request_id = %request_id, model = self.model.name());
        self.chat_inner(&request_id, message, history)
            .instrument(span)
            .await
    }

    async fn chat_inner(
        &self,
        request_id: &str,
        message: &str,
        history: Vec<ChatMessage>,
    ) -> ChatOutcome {
        info!(history = history.len(), "Chat request received");
        EventLogger::log_event(
            request_id,
            AgentEvent::Message {
                role: "user".into(),
                content: message.to_string(),
            },
        );
        if self.notify_each_message {
            self.outbox.notify(format!("New message: {message}"));
        }

        match self.run_loop(request_id, message, history).await {
            Ok(LoopEnd::Answer(answer)) => {
                EventLogger::log_event(
                    request_id,
                    AgentEvent::Message {
                        role: "assistant".into(),
                        content: answer.clone(),
                    },
                );
                self.outbox.record_exchange(message, answer.as_str());
                ChatOutcome::Answer(answer)
            }
            Ok(LoopEnd::Exhausted(rounds)) => {
                warn!(rounds, "Tool round limit reached, returning fallback reply");
                ChatOutcome::Degraded {
                    text: DEGRADED_REPLY.to_string(),
                    rounds,
                }
            }
            Err(e) => {
                let class = ErrorClass::of(&e);
                error!(class = ?class, error = %e, "Chat turn failed");
                EventLogger::log_event(
                    request_id,
                    AgentEvent::Error {
                        class: format!("{class:?}"),
                        error_msg: format!("{e:#}"),
                    },
                );
                ChatOutcome::Failed { class }
            }
        }
    }

    async fn run_loop(
        &self,
        request_id: &str,
        message: &str,
        history: Vec<ChatMessage>,
    ) -> Result<LoopEnd> {
        let mut transcript = Transcript::start(self.system_prompt.clone(), history, message);
        let tools = self.dispatcher.schemas();
        let mut rounds = 0;

        loop {
            debug!(messages = transcript.messages().len(), round = rounds, "Calling model");
            let request = CompletionRequest {
                messages: transcript.messages().to_vec(),
                tools: tools.clone(),
            };
            let completion = self.model.complete(&request).await?;

            let calls = completion.message.requested_calls().to_vec();
            if completion.finish_reason != FinishReason::ToolCalls || calls.is_empty() {
                let answer = completion.message.content.unwrap_or_default();
                return Ok(LoopEnd::Answer(answer));
            }

            if rounds >= self.max_tool_rounds {
                return Ok(LoopEnd::Exhausted(rounds));
            }
            rounds += 1;

            info!(calls = calls.len(), round = rounds, "Model requested tools");
            let results = self.dispatcher.execute_all(request_id, &calls).await?;
            transcript.push_tool_round(completion.message, results);
        }
    }
}
