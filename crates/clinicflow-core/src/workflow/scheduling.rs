//! Appointment scheduling with quota enforcement.

use tracing::info;

use super::{WorkflowError, WorkflowResult};
use crate::db::Database;
use crate::models::{Appointment, Patient, PlanProgress};
use crate::session::Session;

/// Input for scheduling a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: String,
    pub scheduled_at: String,
    pub kind: Option<String>,
    pub objective: Option<String>,
}

impl NewAppointment {
    pub fn new(patient_id: impl Into<String>, scheduled_at: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            scheduled_at: scheduled_at.into(),
            kind: None,
            objective: None,
        }
    }
}

/// Schedule a new pending appointment.
///
/// For patients on a capped plan the completed consultations since the cycle
/// start are counted first; once the quota is used up, creation is rejected
/// with an error naming the plan and its quota. The check happens only at
/// creation time; completion never re-validates it.
pub fn schedule_appointment(
    db: &Database,
    session: &Session,
    request: &NewAppointment,
) -> WorkflowResult<Appointment> {
    if request.patient_id.trim().is_empty() {
        return Err(WorkflowError::MissingField("patient_id"));
    }
    if request.scheduled_at.trim().is_empty() {
        return Err(WorkflowError::MissingField("scheduled_at"));
    }

    let patient = db
        .get_patient(&request.patient_id, &session.user_id)?
        .ok_or_else(|| WorkflowError::PatientNotFound(request.patient_id.clone()))?;

    if let Some(progress) = progress_for(db, &patient)? {
        if progress.is_exhausted() {
            return Err(WorkflowError::QuotaExceeded {
                plan: progress.plan_name,
                quota: progress.quota,
            });
        }
    }

    let mut appointment = Appointment::new(
        session.user_id.clone(),
        patient.id.clone(),
        request.scheduled_at.clone(),
    );
    appointment.kind = request.kind.clone();
    appointment.objective = request.objective.clone();

    db.insert_appointment(&appointment)?;

    info!(
        appointment = %appointment.id,
        patient = %patient.id,
        scheduled_at = %appointment.scheduled_at,
        "appointment scheduled"
    );

    Ok(appointment)
}

/// Consultation usage for a patient's current plan cycle.
///
/// `None` when the patient has no plan or no cycle start yet. Purely a read;
/// used for progress bars and last-session warnings.
pub fn plan_progress(
    db: &Database,
    session: &Session,
    patient_id: &str,
) -> WorkflowResult<Option<PlanProgress>> {
    let patient = db
        .get_patient(patient_id, &session.user_id)?
        .ok_or_else(|| WorkflowError::PatientNotFound(patient_id.to_string()))?;
    progress_for(db, &patient)
}

fn progress_for(db: &Database, patient: &Patient) -> WorkflowResult<Option<PlanProgress>> {
    let (Some(plan_id), Some(cycle_start)) = (&patient.plan_id, &patient.plan_cycle_start) else {
        return Ok(None);
    };

    let plan = db
        .get_plan(plan_id)?
        .ok_or_else(|| WorkflowError::UnknownPlan(plan_id.clone()))?;
    let consultations_used = db.count_completed_since(&patient.id, cycle_start)?;

    let marker = plan.is_marker();
    Ok(Some(PlanProgress {
        plan_id: plan.id,
        plan_name: plan.name,
        consultations_used,
        quota: plan.consultation_quota,
        marker,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, LoyaltyPlan, PatientStatus};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn session() -> Session {
        Session::new("user-1")
    }

    fn setup_patient_on_plan(db: &Database, plan: &LoyaltyPlan, completed: u32) -> Patient {
        db.insert_plan(plan).unwrap();

        let mut patient = Patient::new("user-1".into(), "Maria".into());
        patient.status = PatientStatus::Linked;
        patient.plan_id = Some(plan.id.clone());
        patient.plan_cycle_start = Some("2026-01-01T00:00:00Z".into());
        db.insert_patient(&patient).unwrap();

        for i in 0..completed {
            let mut appt = Appointment::new(
                "user-1".into(),
                patient.id.clone(),
                format!("2026-02-0{}T10:00:00Z", i + 1),
            );
            appt.status = AppointmentStatus::Completed;
            appt.completed_at = Some(format!("2026-02-0{}T11:00:00Z", i + 1));
            db.insert_appointment(&appt).unwrap();
        }

        patient
    }

    #[test]
    fn test_schedule_requires_fields() {
        let db = Database::open_in_memory().unwrap();

        let err = schedule_appointment(&db, &session(), &NewAppointment::new("", "2026-03-01T10:00:00Z"));
        assert!(matches!(err, Err(WorkflowError::MissingField("patient_id"))));

        let err = schedule_appointment(&db, &session(), &NewAppointment::new("p1", " "));
        assert!(matches!(err, Err(WorkflowError::MissingField("scheduled_at"))));
    }

    #[test]
    fn test_quota_allows_until_exhausted() {
        let db = Database::open_in_memory().unwrap();
        let plan = LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1);
        let patient = setup_patient_on_plan(&db, &plan, 3);

        // Three of four used: appointment four is allowed
        let request = NewAppointment::new(patient.id.clone(), "2026-03-01T10:00:00Z");
        assert!(schedule_appointment(&db, &session(), &request).is_ok());
    }

    #[test]
    fn test_quota_rejects_when_used_up() {
        let db = Database::open_in_memory().unwrap();
        let plan = LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1);
        let patient = setup_patient_on_plan(&db, &plan, 4);

        let request = NewAppointment::new(patient.id.clone(), "2026-03-01T10:00:00Z");
        let err = schedule_appointment(&db, &session(), &request).unwrap_err();
        match err {
            WorkflowError::QuotaExceeded { plan, quota } => {
                assert_eq!(plan, "Mensal");
                assert_eq!(quota, 4);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_marker_plan_never_rejected() {
        let db = Database::open_in_memory().unwrap();
        let plan = LoyaltyPlan::marker(dec("150.00"));
        let patient = setup_patient_on_plan(&db, &plan, 9);

        let request = NewAppointment::new(patient.id.clone(), "2026-03-01T10:00:00Z");
        assert!(schedule_appointment(&db, &session(), &request).is_ok());
    }

    #[test]
    fn test_new_patient_without_plan_schedules_freely() {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();

        let request = NewAppointment::new(patient.id.clone(), "2026-03-01T10:00:00Z");
        let appointment = schedule_appointment(&db, &session(), &request).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_plan_progress_reports_usage() {
        let db = Database::open_in_memory().unwrap();
        let plan = LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1);
        let patient = setup_patient_on_plan(&db, &plan, 3);

        let progress = plan_progress(&db, &session(), &patient.id).unwrap().unwrap();
        assert_eq!(progress.consultations_used, 3);
        assert_eq!(progress.quota, 4);
        assert!(progress.is_last_session());
    }

    #[test]
    fn test_plan_progress_none_without_plan() {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();

        assert!(plan_progress(&db, &session(), &patient.id).unwrap().is_none());
    }
}
