//! Clinic workflows: appointment completion, scheduling, plan lifecycle.
//!
//! Pipeline: validate inputs → load records → decide transition → write
//! atomically. Validation failures surface before anything is mutated.

mod completion;
mod scheduling;

pub use completion::*;
pub use scheduling::*;

use thiserror::Error;

/// Workflow errors.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("A loyalty plan must be selected")]
    PlanRequired,

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Appointment {id} is already {status}")]
    AppointmentClosed { id: String, status: &'static str },

    #[error("Plan {plan} allows {quota} consultations per cycle; the quota is already used up")]
    QuotaExceeded { plan: String, quota: u32 },
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_names_plan_and_quota() {
        let err = WorkflowError::QuotaExceeded {
            plan: "Mensal".into(),
            quota: 4,
        };
        let message = err.to_string();
        assert!(message.contains("Mensal"));
        assert!(message.contains('4'));
    }
}
