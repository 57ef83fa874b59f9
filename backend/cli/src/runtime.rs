//! Startup wiring: turns a loaded config into the shared application context.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::info;

use folio_agent::{Persona, ProfileAgent};
use folio_channels::{
    DisabledExchangeLog, DisabledNotifier, GoogleSheetsLog, Outbox, PushoverNotifier,
    ServiceAccountSource,
};
use folio_config::{FolioConfig, ModelConfig, PushoverConfig, SheetsConfig, SheetsCredentials};
use folio_core::{ChatModel, ExchangeLog, Notifier};
use folio_providers::OpenAiCompatProvider;
use folio_tools::builtin_registry;

/// Everything a request needs, built once.
pub struct Services {
    pub agent: ProfileAgent,
    pub model: Arc<dyn ChatModel>,
    /// Outbox worker; finishes once the agent is dropped and the queue drains.
    pub outbox_worker: JoinHandle<()>,
}

pub fn build_services(config: &FolioConfig) -> Result<Services> {
    let persona = Persona::load(
        &config.persona.name,
        &config.persona.summary_path,
        &config.persona.profile_path,
    );
    let model = model_from(&config.model);

    let (outbox, outbox_worker) = Outbox::spawn(
        notifier_from(config.pushover.as_ref()),
        exchange_log_from(config.sheets.as_ref()),
    );
    let registry = builtin_registry(outbox.clone())?;

    let agent = ProfileAgent::new(&persona, model.clone(), registry, outbox)
        .with_max_tool_rounds(config.agent.max_tool_rounds)
        .with_message_notifications(config.agent.notify_each_message);

    info!(
        persona = %persona.name,
        model = %config.model.model,
        max_tool_rounds = config.agent.max_tool_rounds,
        "Agent ready"
    );

    Ok(Services {
        agent,
        model,
        outbox_worker,
    })
}

pub fn model_from(config: &ModelConfig) -> Arc<dyn ChatModel> {
    Arc::new(
        OpenAiCompatProvider::new(config.api_key.clone(), &config.model)
            .with_base_url(&config.base_url)
            .with_timeout(Duration::from_secs(config.timeout_secs)),
    )
}

pub fn notifier_from(config: Option<&PushoverConfig>) -> Arc<dyn Notifier> {
    match config {
        Some(pushover) => Arc::new(
            PushoverNotifier::new(&pushover.token, &pushover.user).with_api_url(&pushover.api_url),
        ),
        None => Arc::new(DisabledNotifier),
    }
}

pub fn exchange_log_from(config: Option<&SheetsConfig>) -> Arc<dyn ExchangeLog> {
    match config {
        Some(sheets) => {
            let source = match &sheets.credentials {
                SheetsCredentials::File(path) => ServiceAccountSource::File(path.clone()),
                SheetsCredentials::Inline(json) => ServiceAccountSource::Inline(json.clone()),
            };
            Arc::new(GoogleSheetsLog::new(source, &sheets.sheet_id, &sheets.range))
        }
        None => Arc::new(DisabledExchangeLog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::defaults::{DEFAULT_PUSHOVER_URL, DEFAULT_SHEET_RANGE};

    #[test]
    fn side_channels_fall_back_to_disabled() {
        assert_eq!(notifier_from(None).name(), "disabled");
        assert_eq!(exchange_log_from(None).name(), "disabled");
    }

    #[test]
    fn configured_side_channels_are_live() {
        let pushover = PushoverConfig {
            token: "tok".into(),
            user: "usr".into(),
            api_url: DEFAULT_PUSHOVER_URL.into(),
        };
        assert_eq!(notifier_from(Some(&pushover)).name(), "pushover");

        let sheets = SheetsConfig {
            sheet_id: "sheet".into(),
            range: DEFAULT_SHEET_RANGE.into(),
            credentials: SheetsCredentials::Inline("{}".into()),
        };
        assert_eq!(exchange_log_from(Some(&sheets)).name(), "google_sheets");
    }

    #[tokio::test]
    async fn services_start_without_credentials() {
        let mut config = FolioConfig::default();
        config.persona.summary_path = "does/not/exist.txt".into();
        config.persona.profile_path = "does/not/exist.pdf".into();

        let services = build_services(&config).unwrap();
        assert_eq!(services.model.name(), "gemini");
        assert!(services
            .agent
            .system_prompt()
            .text()
            .contains("Profile summary temporarily unavailable."));
    }
}
