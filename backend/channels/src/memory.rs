//! In-memory collaborators that record what they were asked to deliver.
//!
//! Handy for tests and for running the service without outbound credentials.

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use folio_core::{ExchangeLog, Notifier};

/// Notifier that keeps every message, optionally failing each delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records attempts but reports every delivery as failed.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
        if self.fail {
            bail!("notification delivery failed");
        }
        Ok(())
    }
}

/// One appended exchange row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRow {
    pub timestamp: String,
    pub message: String,
    pub answer: String,
}

/// Exchange log that keeps every row, optionally failing each append.
#[derive(Default)]
pub struct RecordingExchangeLog {
    rows: Mutex<Vec<ExchangeRow>>,
    fail: bool,
}

impl RecordingExchangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn rows(&self) -> Vec<ExchangeRow> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ExchangeLog for RecordingExchangeLog {
    fn name(&self) -> &str {
        "recording"
    }

    async fn append(&self, timestamp: &str, message: &str, answer: &str) -> Result<()> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ExchangeRow {
                timestamp: timestamp.to_string(),
                message: message.to_string(),
                answer: answer.to_string(),
            });
        if self.fail {
            bail!("sheet append failed");
        }
        Ok(())
    }
}
