//! OpenAI-compatible chat-completions provider with tool calling.
//!
//! Gemini exposes this protocol under `/v1beta/openai`; any compatible
//! endpoint works by swapping the base URL.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use folio_core::{ChatMessage, ChatModel, Completion, CompletionRequest, FinishReason, FolioError};

pub struct OpenAiCompatProvider {
    client: Client,
    name: String,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    /// A provider without a key is still constructible; each call then fails
    /// with a configuration error.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            name: "gemini".to_string(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn api_key(&self) -> Result<&str, FolioError> {
        self.api_key.as_deref().ok_or_else(|| {
            FolioError::Config("GOOGLE_API_KEY environment variable is required but not set".into())
        })
    }

    fn network_error(&self, message: impl Into<String>) -> FolioError {
        FolioError::Network {
            provider: self.name.clone(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn build_body<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: &request.messages,
        tools: request.tools.iter().map(|t| t.to_wire()).collect(),
    }
}

/// Decode a chat-completions body into its first choice.
fn parse_response(body: &str) -> Result<(Completion, Option<u64>), FolioError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| FolioError::MalformedResponse(format!("invalid completion body: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| FolioError::MalformedResponse("completion has no choices".into()))?;

    let completion = Completion {
        message: choice.message,
        finish_reason: FinishReason::parse(choice.finish_reason.as_deref()),
    };
    Ok((completion, response.usage.and_then(|u| u.total_tokens)))
}

#[async_trait]
impl ChatModel for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let api_key = self.api_key()?;
        let start = Instant::now();
        let body = build_body(&self.model, request);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.network_error(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.network_error(format!("failed to read body: {e}")))?;
        if !status.is_success() {
            return Err(self.network_error(format!("{status}: {text}")).into());
        }

        let (completion, tokens) = parse_response(&text)?;

        debug!(
            model = %self.model,
            finish_reason = ?completion.finish_reason,
            tokens_used = tokens.unwrap_or(0),
            latency_ms = start.elapsed().as_millis() as u64,
            "Chat completion received"
        );

        Ok(completion)
    }
}
