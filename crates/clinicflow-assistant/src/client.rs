//! Webhook-backed assistant client.

use serde::Serialize;
use thiserror::Error;

/// Assistant errors.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistant webhook returned status {0}")]
    Status(u16),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Anything that can answer a user message.
pub trait Assistant {
    /// Send one message and return the assistant's reply.
    fn reply(&self, message: &str) -> AssistantResult<String>;
}

/// Request body for the assistant webhook.
#[derive(Debug, Serialize)]
pub struct AssistantRequest<'a> {
    pub message: &'a str,
}

/// Assistant backed by the external chat webhook.
///
/// The webhook answers with plain text, not JSON; the body is returned
/// verbatim so callers persist exactly what was received.
pub struct WebhookAssistant {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl WebhookAssistant {
    /// Create a client for the given webhook endpoint.
    pub fn new(endpoint: &str, timeout_secs: u64) -> AssistantResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Assistant for WebhookAssistant {
    fn reply(&self, message: &str) -> AssistantResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AssistantRequest { message })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status(status.as_u16()));
        }

        Ok(response.text()?)
    }
}
