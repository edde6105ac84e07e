//! Appointment models.

use serde::{Deserialize, Serialize};

/// Scheduling status of an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Scheduled, not yet confirmed by the patient
    Pending,
    /// Confirmed by the patient
    Confirmed,
    /// Visit happened; terminal
    Completed,
    /// Called off; terminal
    Cancelled,
}

impl AppointmentStatus {
    /// Storage string for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a storage string back into a status.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

/// A scheduled visit tied to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// UUID, generated locally
    pub id: String,
    /// User the record belongs to
    pub owner_id: String,
    /// Patient attending the visit
    pub patient_id: String,
    /// Scheduled date and time
    pub scheduled_at: String,
    /// Kind of visit (e.g. "Avaliação", "Retorno")
    pub kind: Option<String>,
    /// Objective stated at scheduling time
    pub objective: Option<String>,
    /// Scheduling status
    pub status: AppointmentStatus,
    /// Professional notes recorded at completion
    pub notes: Option<String>,
    /// Completion timestamp, set exactly once
    pub completed_at: Option<String>,
}

impl Appointment {
    /// Create a new pending appointment.
    pub fn new(owner_id: String, patient_id: String, scheduled_at: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            patient_id,
            scheduled_at,
            kind: None,
            objective: None,
            status: AppointmentStatus::Pending,
            notes: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appointment_is_pending() {
        let appt = Appointment::new("user-1".into(), "patient-1".into(), "2026-03-01T10:00:00Z".into());
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert!(appt.completed_at.is_none());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::parse_str(status.as_str()), Some(status));
        }
    }
}
