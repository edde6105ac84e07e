//! Transactional write sequences for the plan-lifecycle workflows.
//!
//! The completion and plan-assignment procedures touch up to three tables
//! (appointments, patients, ledger). Each sequence runs inside a single
//! transaction so no partial state is ever visible.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, LedgerEntry, Patient};

impl Database {
    /// Apply the write half of the plan-completion workflow atomically.
    ///
    /// `appointment` and `patient` carry the post-decision state; the
    /// appointment row is only touched while still non-terminal, so a
    /// concurrent completion loses with `NotFound` instead of double-booking.
    pub fn apply_completion(
        &mut self,
        appointment: &Appointment,
        patient: &Patient,
        ledger_entry: Option<&LedgerEntry>,
    ) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE appointments SET
                status = ?2,
                notes = ?3,
                completed_at = ?4
            WHERE id = ?1 AND status IN ('pending', 'confirmed')
            "#,
            params![
                appointment.id,
                appointment.status.as_str(),
                appointment.notes,
                appointment.completed_at,
            ],
        )?;
        if rows == 0 {
            return Err(DbError::NotFound(format!(
                "open appointment {}",
                appointment.id
            )));
        }

        let rows = tx.execute(
            r#"
            UPDATE patients SET
                status = ?2,
                plan_id = ?3,
                plan_cycle_start = ?4
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.status.as_str(),
                patient.plan_id,
                patient.plan_cycle_start,
            ],
        )?;
        if rows == 0 {
            return Err(DbError::NotFound(format!("patient {}", patient.id)));
        }

        if let Some(entry) = ledger_entry {
            insert_entry(&tx, entry)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Apply a manual plan assignment (or renewal) atomically.
    pub fn apply_plan_assignment(
        &mut self,
        patient: &Patient,
        ledger_entry: Option<&LedgerEntry>,
    ) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE patients SET
                status = ?2,
                plan_id = ?3,
                plan_cycle_start = ?4
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.status.as_str(),
                patient.plan_id,
                patient.plan_cycle_start,
            ],
        )?;
        if rows == 0 {
            return Err(DbError::NotFound(format!("patient {}", patient.id)));
        }

        if let Some(entry) = ledger_entry {
            insert_entry(&tx, entry)?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn insert_entry(tx: &rusqlite::Transaction<'_>, entry: &LedgerEntry) -> DbResult<()> {
    tx.execute(
        r#"
        INSERT INTO ledger (id, owner_id, kind, amount, category, description, entry_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            entry.id,
            entry.owner_id,
            entry.kind.as_str(),
            entry.amount.to_string(),
            entry.category,
            entry.description,
            entry.entry_date,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, LoyaltyPlan, PatientStatus};

    fn setup() -> (Database, Patient, Appointment) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();
        let appointment = Appointment::new(
            "user-1".into(),
            patient.id.clone(),
            "2026-03-01T10:00:00Z".into(),
        );
        db.insert_appointment(&appointment).unwrap();
        (db, patient, appointment)
    }

    #[test]
    fn test_apply_completion_writes_all_rows() {
        let (mut db, mut patient, mut appointment) = setup();

        let mut plan = LoyaltyPlan::new("Plan Mensal".into(), "500.00".parse().unwrap(), 4, 1);
        plan.id = "plan-1".into();
        db.insert_plan(&plan).unwrap();

        appointment.status = AppointmentStatus::Completed;
        appointment.notes = Some("Great progress".into());
        appointment.completed_at = Some("2026-03-01T11:00:00Z".into());
        patient.status = PatientStatus::Linked;
        patient.plan_id = Some("plan-1".into());
        patient.plan_cycle_start = Some("2026-03-01T11:00:00Z".into());

        let entry = LedgerEntry::revenue(
            "user-1".into(),
            "500.00".parse().unwrap(),
            "Loyalty Plans".into(),
            "Plan Mensal - Maria".into(),
        );

        db.apply_completion(&appointment, &patient, Some(&entry))
            .unwrap();

        let stored = db.get_appointment(&appointment.id, "user-1").unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Completed);
        assert_eq!(stored.notes, Some("Great progress".into()));

        let stored = db.get_patient(&patient.id, "user-1").unwrap().unwrap();
        assert_eq!(stored.status, PatientStatus::Linked);

        let entries = db.find_ledger_by_description("user-1", "Maria").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_apply_completion_rejects_closed_appointment() {
        let (mut db, patient, mut appointment) = setup();

        db.cancel_appointment(&appointment.id).unwrap();

        appointment.status = AppointmentStatus::Completed;
        appointment.completed_at = Some("2026-03-01T11:00:00Z".into());

        let result = db.apply_completion(&appointment, &patient, None);
        assert!(matches!(result, Err(DbError::NotFound(_))));

        // Nothing was written
        let stored = db.get_appointment(&appointment.id, "user-1").unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_failed_sequence_leaves_no_partial_state() {
        let (mut db, mut patient, mut appointment) = setup();

        appointment.status = AppointmentStatus::Completed;
        appointment.completed_at = Some("2026-03-01T11:00:00Z".into());
        patient.status = PatientStatus::Linked;
        // Unknown plan id violates the foreign key inside the transaction
        patient.plan_id = Some("no-such-plan".into());
        patient.plan_cycle_start = Some("2026-03-01T11:00:00Z".into());

        let result = db.apply_completion(&appointment, &patient, None);
        assert!(result.is_err());

        // The appointment update rolled back with the patient failure
        let stored = db.get_appointment(&appointment.id, "user-1").unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_apply_plan_assignment() {
        let (mut db, mut patient, _) = setup();

        patient.status = PatientStatus::Linked;
        patient.plan_id = None; // keep FK simple; plan linkage covered above
        patient.plan_cycle_start = Some("2026-03-01T11:00:00Z".into());

        db.apply_plan_assignment(&patient, None).unwrap();

        let stored = db.get_patient(&patient.id, "user-1").unwrap().unwrap();
        assert_eq!(stored.status, PatientStatus::Linked);
        assert_eq!(stored.plan_cycle_start, Some("2026-03-01T11:00:00Z".into()));
    }
}
