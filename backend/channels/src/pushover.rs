//! Pushover push notifications.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use folio_core::Notifier;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PushoverNotifier {
    client: Client,
    token: String,
    user: String,
    api_url: String,
}

impl PushoverNotifier {
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            user: user.into(),
            api_url: "https://api.pushover.net/1/messages.json".to_string(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn notify(&self, text: &str) -> Result<()> {
        debug!("Sending push notification");

        let response = self
            .client
            .post(&self.api_url)
            .timeout(NOTIFY_TIMEOUT)
            .form(&[
                ("token", self.token.as_str()),
                ("user", self.user.as_str()),
                ("message", text),
            ])
            .send()
            .await
            .context("Pushover HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Pushover returned {}: {}", status, body);
        }

        info!("Push notification sent");
        Ok(())
    }
}

/// Stand-in used when Pushover credentials are not configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn notify(&self, _text: &str) -> Result<()> {
        info!("Pushover credentials not configured, skipping notification");
        Ok(())
    }
}
