//! `record_user_details`: capture a visitor who wants to stay in touch.

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
struct UserDetails {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

pub struct RecordUserDetailsTool {
    outbox: Outbox,
}

impl RecordUserDetailsTool {
    pub fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn name(&self) -> &str {
        "record_user_details"
    }

    fn description(&self) -> &str {
        "Use this tool to record that a user is interested in being in touch and provided an email address"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let details: UserDetails = decode_args(self.name(), args)?;
        info!("Recording visitor contact details");

        let name = details.name.as_deref().unwrap_or("Name not provided");
        let notes = details.notes.as_deref().unwrap_or("not provided");
        record(
            &self.outbox,
            self.name(),
            format!(
                "Recording {} with email {} and notes {}",
                name, details.email, notes
            ),
        );

        Ok(recorded_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_channels::{RecordingExchangeLog, RecordingNotifier};
    use folio_core::{ErrorClass, FolioError};
    use std::sync::Arc;

    #[tokio::test]
    async fn records_minimal_and_full_details_despite_failing_notifier() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let log = Arc::new(RecordingExchangeLog::failing());
        let (outbox, worker) = Outbox::spawn(notifier.clone(), log.clone());
        let tool = RecordUserDetailsTool::new(outbox);

        let minimal = tool.execute(json!({"email": "a@b.com"})).await.unwrap();
        let full = tool
            .execute(json!({"email": "a@b.com", "name": "X", "notes": "Y"}))
            .await
            .unwrap();
        assert_eq!(minimal, json!({"recorded": "ok"}));
        assert_eq!(full, json!({"recorded": "ok"}));

        drop(tool);
        worker.await.unwrap();
        assert_eq!(
            notifier.sent(),
            vec![
                "Recording Name not provided with email a@b.com and notes not provided",
                "Recording X with email a@b.com and notes Y",
            ]
        );
        let rows = log.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].message, "record_user_details");
        assert_eq!(rows[1].answer, "Recording X with email a@b.com and notes Y");
    }

    #[tokio::test]
    async fn rejects_missing_email_and_extra_fields() {
        let (outbox, _worker) = Outbox::spawn(
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingExchangeLog::new()),
        );
        let tool = RecordUserDetailsTool::new(outbox);

        let err = tool.execute(json!({"name": "X"})).await.unwrap_err();
        let folio = err.downcast_ref::<FolioError>().unwrap();
        assert_eq!(folio.class(), ErrorClass::Parsing);

        assert!(tool
            .execute(json!({"email": "a@b.com", "phone": "123"}))
            .await
            .is_err());
    }
}
