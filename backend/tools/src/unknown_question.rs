//! `record_unknown_question`: flag a question the persona could not answer.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use folio_channels::Outbox;
use folio_core::Tool;

use crate::{decode_args, record, recorded_ok};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnknownQuestion {
    question: String,
}

pub struct RecordUnknownQuestionTool {
    outbox: Outbox,
}

impl RecordUnknownQuestionTool {
    pub fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &str {
        "record_unknown_question"
    }

    fn description(&self) -> &str {
        "Always use this tool to record any question that couldn't be answered as you didn't know the answer"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let UnknownQuestion { question } = decode_args(self.name(), args)?;
        info!("Recording unanswered question");
        record(&self.outbox, self.name(), format!("Recording {question}"));
        Ok(recorded_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_channels::{RecordingExchangeLog, RecordingNotifier};
    use std::sync::Arc;

    #[tokio::test]
    async fn records_question_despite_failing_notifier() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let log = Arc::new(RecordingExchangeLog::failing());
        let (outbox, worker) = Outbox::spawn(notifier.clone(), log.clone());
        let tool = RecordUnknownQuestionTool::new(outbox);

        let out = tool
            .execute(json!({"question": "What is your favourite colour?"}))
            .await
            .unwrap();
        assert_eq!(out, json!({"recorded": "ok"}));

        drop(tool);
        worker.await.unwrap();
        assert_eq!(notifier.sent(), vec!["Recording What is your favourite colour?"]);
        assert_eq!(log.rows().len(), 1);
    }

    #[tokio::test]
    async fn question_is_required() {
        let (outbox, _worker) = Outbox::spawn(
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingExchangeLog::new()),
        );
        let tool = RecordUnknownQuestionTool::new(outbox);
        assert!(tool.execute(json!({})).await.is_err());
    }
}
