//! Google Sheets exchange log.
//!
//! Authenticates as a service account (RS256 JWT bearer grant) and appends
//! one `[timestamp, message, answer]` row per completed exchange.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::Client;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use tokio::sync::Mutex;
use tracing::{debug, info};

use folio_core::ExchangeLog;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const APPEND_TIMEOUT: Duration = Duration::from_secs(15);
/// Refresh tokens this long before they expire.
const TOKEN_SLACK: Duration = Duration::from_secs(60);
/// Upper bound on a cached token's lifetime, whatever the endpoint claims.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Where the service-account key JSON lives.
#[derive(Debug, Clone)]
pub enum ServiceAccountSource {
    File(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct GoogleSheetsLog {
    client: Client,
    source: ServiceAccountSource,
    api_base: String,
    sheet_id: String,
    range: String,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleSheetsLog {
    pub fn new(
        source: ServiceAccountSource,
        sheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            source,
            api_base: SHEETS_API.to_string(),
            sheet_id: sheet_id.into(),
            range: range.into(),
            token: Mutex::new(None),
        }
    }

    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    async fn load_key(&self) -> Result<ServiceAccountKey> {
        let raw = match &self.source {
            ServiceAccountSource::Inline(json) => json.clone(),
            ServiceAccountSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read service account key {}", path.display()))?,
        };
        serde_json::from_str(&raw).context("Invalid service account key JSON")
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_SLACK {
                return Ok(token.value.clone());
            }
        }

        let key = self.load_key().await?;
        let assertion = build_assertion(&key, chrono::Utc::now().timestamp())?;

        debug!(account = %key.client_email, "Exchanging service account assertion");
        let response = self
            .client
            .post(&key.token_uri)
            .timeout(APPEND_TIMEOUT)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Google token request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Google token endpoint returned {}: {}", status, body);
        }
        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Google token response")?;

        let value = token.access_token.clone();
        *cached = Some(AccessToken {
            value: token.access_token,
            expires_at: token_deadline(Instant::now(), token.expires_in),
        });
        Ok(value)
    }

    fn append_url(&self) -> String {
        format!(
            "{}/{}/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.api_base.trim_end_matches('/'),
            self.sheet_id,
            urlencoding::encode(&self.range)
        )
    }
}

fn token_deadline(now: Instant, expires_in: u64) -> Instant {
    let lifetime = Duration::from_secs(expires_in).min(MAX_TOKEN_LIFETIME);
    now.checked_add(lifetime).unwrap_or(now)
}

/// Signed `header.claims.signature` assertion for the JWT bearer grant.
fn build_assertion(key: &ServiceAccountKey, now: i64) -> Result<String> {
    let header = URL_SAFE_NO_PAD.encode(json!({"alg": "RS256", "typ": "JWT"}).to_string());
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + 3600,
    };
    let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let signing_input = format!("{header}.{claims}");

    let private_key = RsaPrivateKey::from_pkcs8_pem(&key.private_key)
        .context("Service account private key is not PKCS#8 PEM")?;
    let signature = SigningKey::<Sha256>::new(private_key).sign(signing_input.as_bytes());

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

#[async_trait]
impl ExchangeLog for GoogleSheetsLog {
    fn name(&self) -> &str {
        "google_sheets"
    }

    async fn append(&self, timestamp: &str, message: &str, answer: &str) -> Result<()> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(token)
            .timeout(APPEND_TIMEOUT)
            .json(&json!({ "values": [[timestamp, message, answer]] }))
            .send()
            .await
            .context("Google Sheets append request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Google Sheets returned {}: {}", status, body);
        }

        info!(sheet = %self.sheet_id, "Exchange written to Google Sheets");
        Ok(())
    }
}

/// Stand-in used when the sheet is not configured.
pub struct DisabledExchangeLog;

#[async_trait]
impl ExchangeLog for DisabledExchangeLog {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn append(&self, _timestamp: &str, _message: &str, _answer: &str) -> Result<()> {
        info!("Google Sheets credentials or Sheet ID not configured");
        Ok(())
    }
}
