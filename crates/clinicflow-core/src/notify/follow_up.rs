//! Follow-up scheduling webhook client.

use serde::Serialize;
use tracing::{debug, warn};

use super::{NotifyError, NotifyResult};
use crate::models::Patient;

/// Payload for the follow-up scheduling webhook.
///
/// Field names are the webhook's wire contract and must not change.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FollowUpPayload {
    pub id: String,
    pub nome: String,
    pub telefone: String,
    pub data_inicio_plano_atual: Option<String>,
}

impl FollowUpPayload {
    /// Build the payload for a patient.
    ///
    /// Returns `None` when the patient has no phone: there is nobody to call.
    pub fn for_patient(patient: &Patient) -> Option<Self> {
        let telefone = patient.phone.clone()?;
        Some(Self {
            id: patient.id.clone(),
            nome: patient.name.clone(),
            telefone,
            data_inicio_plano_atual: patient.plan_cycle_start.clone(),
        })
    }
}

/// HTTP client for the follow-up scheduling webhook.
#[derive(Clone)]
pub struct FollowUpClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl FollowUpClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: &str, timeout_secs: u64) -> NotifyResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Post the payload and check the response status.
    pub fn send(&self, payload: &FollowUpPayload) -> NotifyResult<()> {
        let response = self.client.post(&self.endpoint).json(payload).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Fire-and-forget dispatch on a detached thread.
    ///
    /// Failures are logged and never propagated; the caller path that
    /// reported success to the user is unaffected.
    pub fn dispatch_detached(&self, payload: FollowUpPayload) -> std::thread::JoinHandle<()> {
        let client = self.clone();
        std::thread::spawn(move || match client.send(&payload) {
            Ok(()) => debug!(patient = %payload.id, "follow-up scheduled"),
            Err(e) => warn!(error = %e, patient = %payload.id, "follow-up webhook failed"),
        })
    }
}
