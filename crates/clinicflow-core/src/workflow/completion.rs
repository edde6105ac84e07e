//! Appointment completion and plan assignment.

use tracing::info;

use super::{WorkflowError, WorkflowResult};
use crate::db::Database;
use crate::models::{
    Appointment, AppointmentStatus, LedgerEntry, LoyaltyPlan, Patient, PatientStatus,
    PLAN_REVENUE_CATEGORY,
};
use crate::notify::FollowUpPayload;
use crate::session::Session;

/// Input for marking an appointment complete.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Appointment being closed
    pub appointment_id: String,
    /// Free-text professional notes
    pub notes: String,
    /// Selected loyalty plan; selection is mandatory
    pub plan_id: String,
    /// Whether to notify the follow-up scheduler afterwards
    pub schedule_follow_up: bool,
}

impl CompletionRequest {
    pub fn new(appointment_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            notes: String::new(),
            plan_id: plan_id.into(),
            schedule_follow_up: false,
        }
    }
}

/// How a completion changes the patient's plan state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTransition {
    /// New patient chose a real plan: link, start cycle, book revenue
    Enrolled,
    /// New patient chose the marker plan: unlinked, start cycle, no revenue
    SingleVisit,
    /// Existing patient switched plans at visit time; cycle start untouched
    PlanChanged,
    /// Existing patient, same plan as before
    Unchanged,
}

/// Decide the plan transition for a completion.
///
/// The cycle start is only established on the new-patient paths; a plan
/// change for an existing patient deliberately keeps the running cycle.
pub fn decide_transition(patient: &Patient, plan: &LoyaltyPlan) -> PlanTransition {
    match patient.status {
        PatientStatus::New => {
            if plan.is_marker() {
                PlanTransition::SingleVisit
            } else {
                PlanTransition::Enrolled
            }
        }
        _ => {
            if patient.plan_id.as_deref() != Some(plan.id.as_str()) {
                PlanTransition::PlanChanged
            } else {
                PlanTransition::Unchanged
            }
        }
    }
}

/// Result of a successful completion.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub appointment: Appointment,
    pub patient: Patient,
    /// Revenue entry booked by this completion, if any
    pub ledger_entry: Option<LedgerEntry>,
    pub transition: PlanTransition,
    /// Ready-to-send webhook payload when follow-up was requested and the
    /// patient can be reached
    pub follow_up: Option<FollowUpPayload>,
}

/// Mark an appointment complete and settle the patient's plan state.
///
/// Validates before mutating: the plan selection is mandatory, the plan must
/// exist, and the appointment must still be open. Re-completing a completed
/// appointment is rejected, which also guarantees at most one ledger entry
/// per completion. All writes happen in one transaction.
pub fn complete_appointment(
    db: &mut Database,
    session: &Session,
    request: &CompletionRequest,
) -> WorkflowResult<CompletionOutcome> {
    if request.plan_id.trim().is_empty() {
        return Err(WorkflowError::PlanRequired);
    }

    let mut appointment = db
        .get_appointment(&request.appointment_id, &session.user_id)?
        .ok_or_else(|| WorkflowError::AppointmentNotFound(request.appointment_id.clone()))?;
    if appointment.status.is_terminal() {
        return Err(WorkflowError::AppointmentClosed {
            id: appointment.id,
            status: appointment.status.as_str(),
        });
    }

    let mut patient = db
        .get_patient(&appointment.patient_id, &session.user_id)?
        .ok_or_else(|| WorkflowError::PatientNotFound(appointment.patient_id.clone()))?;
    let plan = db
        .get_plan(&request.plan_id)?
        .ok_or_else(|| WorkflowError::UnknownPlan(request.plan_id.clone()))?;

    let now = chrono::Utc::now().to_rfc3339();
    appointment.status = AppointmentStatus::Completed;
    appointment.completed_at = Some(now.clone());
    appointment.notes = if request.notes.trim().is_empty() {
        None
    } else {
        Some(request.notes.clone())
    };

    let transition = decide_transition(&patient, &plan);
    let mut ledger_entry = None;
    match transition {
        PlanTransition::Enrolled => {
            patient.status = PatientStatus::Linked;
            patient.plan_id = Some(plan.id.clone());
            patient.plan_cycle_start = Some(now.clone());
            ledger_entry = Some(plan_revenue_entry(&plan, &patient));
        }
        PlanTransition::SingleVisit => {
            patient.status = PatientStatus::Unlinked;
            patient.plan_id = Some(plan.id.clone());
            patient.plan_cycle_start = Some(now);
        }
        PlanTransition::PlanChanged => {
            patient.plan_id = Some(plan.id.clone());
        }
        PlanTransition::Unchanged => {}
    }

    db.apply_completion(&appointment, &patient, ledger_entry.as_ref())?;

    info!(
        appointment = %appointment.id,
        patient = %patient.id,
        plan = %plan.name,
        transition = ?transition,
        "appointment completed"
    );

    let follow_up = if request.schedule_follow_up {
        FollowUpPayload::for_patient(&patient)
    } else {
        None
    };

    Ok(CompletionOutcome {
        appointment,
        patient,
        ledger_entry,
        transition,
        follow_up,
    })
}

/// Result of a manual plan assignment.
#[derive(Debug, Clone)]
pub struct PlanAssignment {
    pub patient: Patient,
    pub ledger_entry: Option<LedgerEntry>,
}

/// Manually attach (or renew) a plan for a patient outside of a visit.
///
/// Unlike a completion-time plan change, this resets the consultation cycle:
/// the new cycle starts now. Non-marker plans book a revenue entry.
pub fn assign_plan(
    db: &mut Database,
    session: &Session,
    patient_id: &str,
    plan_id: &str,
) -> WorkflowResult<PlanAssignment> {
    if plan_id.trim().is_empty() {
        return Err(WorkflowError::PlanRequired);
    }

    let mut patient = db
        .get_patient(patient_id, &session.user_id)?
        .ok_or_else(|| WorkflowError::PatientNotFound(patient_id.to_string()))?;
    let plan = db
        .get_plan(plan_id)?
        .ok_or_else(|| WorkflowError::UnknownPlan(plan_id.to_string()))?;

    patient.status = if plan.is_marker() {
        PatientStatus::Unlinked
    } else {
        PatientStatus::Linked
    };
    patient.plan_id = Some(plan.id.clone());
    patient.plan_cycle_start = Some(chrono::Utc::now().to_rfc3339());

    let ledger_entry = if plan.is_marker() {
        None
    } else {
        Some(plan_revenue_entry(&plan, &patient))
    };

    db.apply_plan_assignment(&patient, ledger_entry.as_ref())?;

    info!(patient = %patient.id, plan = %plan.name, "plan assigned");

    Ok(PlanAssignment {
        patient,
        ledger_entry,
    })
}

fn plan_revenue_entry(plan: &LoyaltyPlan, patient: &Patient) -> LedgerEntry {
    LedgerEntry::revenue(
        patient.owner_id.clone(),
        plan.price,
        PLAN_REVENUE_CATEGORY.into(),
        format!("Plan {} - {}", plan.name, patient.name),
    )
}
