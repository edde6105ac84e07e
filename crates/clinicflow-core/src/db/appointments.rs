//! Appointment database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};

/// Raw row before status parsing.
struct AppointmentRow {
    id: String,
    owner_id: String,
    patient_id: String,
    scheduled_at: String,
    kind: Option<String>,
    objective: Option<String>,
    status: String,
    notes: Option<String>,
    completed_at: Option<String>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> DbResult<Appointment> {
        let status = AppointmentStatus::parse_str(&row.status).ok_or_else(|| {
            DbError::Constraint(format!("unknown appointment status: {}", row.status))
        })?;
        Ok(Appointment {
            id: row.id,
            owner_id: row.owner_id,
            patient_id: row.patient_id,
            scheduled_at: row.scheduled_at,
            kind: row.kind,
            objective: row.objective,
            status,
            notes: row.notes,
            completed_at: row.completed_at,
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        patient_id: row.get(2)?,
        scheduled_at: row.get(3)?,
        kind: row.get(4)?,
        objective: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
        completed_at: row.get(8)?,
    })
}

const APPOINTMENT_COLUMNS: &str =
    "id, owner_id, patient_id, scheduled_at, kind, objective, status, notes, completed_at";

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, owner_id, patient_id, scheduled_at, kind,
                objective, status, notes, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                appointment.id,
                appointment.owner_id,
                appointment.patient_id,
                appointment.scheduled_at,
                appointment.kind,
                appointment.objective,
                appointment.status.as_str(),
                appointment.notes,
                appointment.completed_at,
            ],
        )?;
        Ok(())
    }

    /// Update scheduling details of an appointment.
    pub fn update_appointment(&self, appointment: &Appointment) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                scheduled_at = ?2,
                kind = ?3,
                objective = ?4
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.scheduled_at,
                appointment.kind,
                appointment.objective,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by ID, scoped to its owner.
    pub fn get_appointment(&self, id: &str, owner_id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ? AND owner_id = ?"),
                [id, owner_id],
                map_row,
            )
            .optional()?
            .map(Appointment::try_from)
            .transpose()
    }

    /// List appointments for a patient, most recent first.
    pub fn list_appointments_for_patient(
        &self,
        patient_id: &str,
        owner_id: &str,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE patient_id = ? AND owner_id = ? ORDER BY scheduled_at DESC"
        ))?;

        let rows = stmt.query_map([patient_id, owner_id], map_row)?;
        rows.map(|r| Appointment::try_from(r?)).collect()
    }

    /// List appointments scheduled within `[from, to)`, for the agenda view.
    pub fn list_appointments_between(
        &self,
        owner_id: &str,
        from: &str,
        to: &str,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE owner_id = ? AND scheduled_at >= ? AND scheduled_at < ? \
             ORDER BY scheduled_at"
        ))?;

        let rows = stmt.query_map([owner_id, from, to], map_row)?;
        rows.map(|r| Appointment::try_from(r?)).collect()
    }

    /// Mark a pending appointment confirmed. Returns false if the
    /// appointment is missing or already closed.
    pub fn confirm_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = 'confirmed' WHERE id = ? AND status = 'pending'",
            [id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Cancel a non-terminal appointment. Returns false if the appointment
    /// is missing or already closed.
    pub fn cancel_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = 'cancelled' \
             WHERE id = ? AND status IN ('pending', 'confirmed')",
            [id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count completed appointments for a patient since a cycle start date.
    pub fn count_completed_since(&self, patient_id: &str, since: &str) -> DbResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM appointments \
             WHERE patient_id = ? AND status = 'completed' AND completed_at >= ?",
            [patient_id, since],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;

    fn setup_db_with_patient() -> (Database, Patient) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();
        (db, patient)
    }

    fn make_appointment(patient: &Patient, scheduled_at: &str) -> Appointment {
        Appointment::new("user-1".into(), patient.id.clone(), scheduled_at.into())
    }

    #[test]
    fn test_insert_and_get() {
        let (db, patient) = setup_db_with_patient();

        let appt = make_appointment(&patient, "2026-03-01T10:00:00Z");
        db.insert_appointment(&appt).unwrap();

        let retrieved = db.get_appointment(&appt.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved.patient_id, patient.id);
        assert_eq!(retrieved.status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_list_between() {
        let (db, patient) = setup_db_with_patient();

        for day in ["2026-03-01T10:00:00Z", "2026-03-15T10:00:00Z", "2026-04-02T10:00:00Z"] {
            db.insert_appointment(&make_appointment(&patient, day)).unwrap();
        }

        let march = db
            .list_appointments_between("user-1", "2026-03-01T00:00:00Z", "2026-04-01T00:00:00Z")
            .unwrap();
        assert_eq!(march.len(), 2);
        assert!(march[0].scheduled_at < march[1].scheduled_at);
    }

    #[test]
    fn test_confirm_then_cancel() {
        let (db, patient) = setup_db_with_patient();

        let appt = make_appointment(&patient, "2026-03-01T10:00:00Z");
        db.insert_appointment(&appt).unwrap();

        assert!(db.confirm_appointment(&appt.id).unwrap());
        // Already confirmed, not pending anymore
        assert!(!db.confirm_appointment(&appt.id).unwrap());

        assert!(db.cancel_appointment(&appt.id).unwrap());
        let retrieved = db.get_appointment(&appt.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved.status, AppointmentStatus::Cancelled);

        // Cancelled is terminal
        assert!(!db.cancel_appointment(&appt.id).unwrap());
    }

    #[test]
    fn test_count_completed_since() {
        let (db, patient) = setup_db_with_patient();

        let mut old = make_appointment(&patient, "2025-12-01T10:00:00Z");
        old.status = AppointmentStatus::Completed;
        old.completed_at = Some("2025-12-01T11:00:00Z".into());
        db.insert_appointment(&old).unwrap();

        for ts in ["2026-02-01T11:00:00Z", "2026-02-15T11:00:00Z"] {
            let mut appt = make_appointment(&patient, ts);
            appt.status = AppointmentStatus::Completed;
            appt.completed_at = Some(ts.into());
            db.insert_appointment(&appt).unwrap();
        }

        let pending = make_appointment(&patient, "2026-02-20T10:00:00Z");
        db.insert_appointment(&pending).unwrap();

        let count = db
            .count_completed_since(&patient.id, "2026-01-01T00:00:00Z")
            .unwrap();
        assert_eq!(count, 2);
    }
}
