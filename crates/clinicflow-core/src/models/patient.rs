//! Patient models.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a patient, driving billing behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientStatus {
    /// Registered but no completed appointment yet
    New,
    /// Enrolled in a recurring loyalty plan
    Linked,
    /// Attends one-off visits, no recurring plan
    Unlinked,
}

impl PatientStatus {
    /// Storage string for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::New => "new",
            PatientStatus::Linked => "linked",
            PatientStatus::Unlinked => "unlinked",
        }
    }

    /// Parse a storage string back into a status.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(PatientStatus::New),
            "linked" => Some(PatientStatus::Linked),
            "unlinked" => Some(PatientStatus::Unlinked),
            _ => None,
        }
    }
}

/// A person under care.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated locally
    pub id: String,
    /// User the record belongs to
    pub owner_id: String,
    /// Patient name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<String>,
    /// Treatment goal
    pub goal: Option<String>,
    /// Dietary/clinical restrictions
    pub restrictions: Option<String>,
    /// Lifecycle status
    pub status: PatientStatus,
    /// Active loyalty plan, if any
    pub plan_id: Option<String>,
    /// Anchor date for the current plan's consultation window
    pub plan_cycle_start: Option<String>,
    /// Registration timestamp
    pub registered_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(owner_id: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            name,
            phone: None,
            email: None,
            date_of_birth: None,
            goal: None,
            restrictions: None,
            status: PatientStatus::New,
            plan_id: None,
            plan_cycle_start: None,
            registered_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the patient has a plan attached.
    pub fn has_active_plan(&self) -> bool {
        self.plan_id.is_some()
    }
}
