use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use anatomize_core::model::{QuizQuestion, QuizQuestionDraft, Region, RelaySettings, RelaySettingsDraft};

use crate::error::RelayError;

/// Relay settings as found in the environment, before validation.
#[derive(Clone, Debug, Default)]
pub struct RelayConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl RelayConfig {
    /// Read `ANATOMIZE_RELAY_URL` and `ANATOMIZE_RELAY_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("ANATOMIZE_RELAY_URL").ok();
        let timeout_secs = env::var("ANATOMIZE_RELAY_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!(value = %raw, "ignoring non-numeric relay timeout");
                    None
                }
            });
        Self {
            base_url,
            timeout_secs,
        }
    }

    /// Replace the base URL when an override is given.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        self
    }

    /// Validate, falling back to defaults when the values are unusable.
    #[must_use]
    pub fn resolve(self) -> RelaySettings {
        let draft = RelaySettingsDraft {
            base_url: self.base_url,
            timeout_secs: self.timeout_secs,
        };
        draft.validate().unwrap_or_else(|err| {
            warn!(error = %err, "invalid relay configuration, using defaults");
            RelaySettings::default()
        })
    }
}

/// The remote tutoring service.
#[async_trait]
pub trait TutorRelay: Send + Sync {
    /// Ask the tutor a question about `region` and return its reply.
    ///
    /// # Errors
    ///
    /// Returns `RelayError` on transport failure, a non-success status, or a
    /// response without a usable reply.
    async fn chat(&self, region: Region, input_text: &str) -> Result<String, RelayError>;

    /// Request a freshly generated question for `region`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError` on transport failure, a non-success status, or a
    /// question that fails validation.
    async fn quiz(&self, region: Region) -> Result<QuizQuestion, RelayError>;

    /// Check that the relay is reachable and healthy.
    ///
    /// # Errors
    ///
    /// Returns `RelayError` if the probe fails or reports a non-ok status.
    async fn health(&self) -> Result<(), RelayError>;
}

/// `TutorRelay` over HTTP+JSON.
#[derive(Clone)]
pub struct HttpRelayClient {
    client: Client,
    settings: RelaySettings,
}

impl HttpRelayClient {
    /// Build a client whose requests time out after the configured limit.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new(settings: RelaySettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs()))
            .build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }
}

#[async_trait]
impl TutorRelay for HttpRelayClient {
    async fn chat(&self, region: Region, input_text: &str) -> Result<String, RelayError> {
        let payload = ChatRequest { region, input_text };
        let response = self
            .client
            .post(self.settings.endpoint("chat"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RelayError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        body.reply
            .filter(|reply| !reply.trim().is_empty())
            .ok_or(RelayError::EmptyReply)
    }

    async fn quiz(&self, region: Region) -> Result<QuizQuestion, RelayError> {
        let response = self
            .client
            .post(self.settings.endpoint("quiz"))
            .json(&QuizRequest { region })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RelayError::HttpStatus(response.status()));
        }

        let draft: QuizQuestionDraft = response.json().await?;
        Ok(draft.validate()?)
    }

    async fn health(&self) -> Result<(), RelayError> {
        let response = self
            .client
            .get(self.settings.endpoint("health"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RelayError::HttpStatus(response.status()));
        }

        let body: HealthResponse = response.json().await?;
        if body.status == "ok" {
            Ok(())
        } else {
            Err(RelayError::Unhealthy(body.status))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    region: Region,
    input_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Serialize)]
struct QuizRequest {
    region: Region,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}
