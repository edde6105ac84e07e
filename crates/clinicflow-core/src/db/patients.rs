//! Patient database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Patient, PatientStatus};

/// Raw row before status parsing.
struct PatientRow {
    id: String,
    owner_id: String,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    date_of_birth: Option<String>,
    goal: Option<String>,
    restrictions: Option<String>,
    status: String,
    plan_id: Option<String>,
    plan_cycle_start: Option<String>,
    registered_at: String,
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> DbResult<Patient> {
        let status = PatientStatus::parse_str(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("unknown patient status: {}", row.status)))?;
        Ok(Patient {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            date_of_birth: row.date_of_birth,
            goal: row.goal,
            restrictions: row.restrictions,
            status,
            plan_id: row.plan_id,
            plan_cycle_start: row.plan_cycle_start,
            registered_at: row.registered_at,
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        date_of_birth: row.get(5)?,
        goal: row.get(6)?,
        restrictions: row.get(7)?,
        status: row.get(8)?,
        plan_id: row.get(9)?,
        plan_cycle_start: row.get(10)?,
        registered_at: row.get(11)?,
    })
}

const PATIENT_COLUMNS: &str = "id, owner_id, name, phone, email, date_of_birth, goal, \
                               restrictions, status, plan_id, plan_cycle_start, registered_at";

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, owner_id, name, phone, email, date_of_birth, goal,
                restrictions, status, plan_id, plan_cycle_start, registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                patient.id,
                patient.owner_id,
                patient.name,
                patient.phone,
                patient.email,
                patient.date_of_birth,
                patient.goal,
                patient.restrictions,
                patient.status.as_str(),
                patient.plan_id,
                patient.plan_cycle_start,
                patient.registered_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                phone = ?3,
                email = ?4,
                date_of_birth = ?5,
                goal = ?6,
                restrictions = ?7,
                status = ?8,
                plan_id = ?9,
                plan_cycle_start = ?10
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.phone,
                patient.email,
                patient.date_of_birth,
                patient.goal,
                patient.restrictions,
                patient.status.as_str(),
                patient.plan_id,
                patient.plan_cycle_start,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID, scoped to its owner.
    pub fn get_patient(&self, id: &str, owner_id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ? AND owner_id = ?"),
                [id, owner_id],
                map_row,
            )
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// List all patients for an owner, ordered by name.
    pub fn list_patients(&self, owner_id: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE owner_id = ? ORDER BY name"
        ))?;

        let rows = stmt.query_map([owner_id], map_row)?;
        rows.map(|r| Patient::try_from(r?)).collect()
    }

    /// Search patients by name.
    ///
    /// Substring matches are ranked by Jaro-Winkler similarity to the query
    /// so near-exact hits come first.
    pub fn search_patients(&self, owner_id: &str, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("%{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE owner_id = ? AND name LIKE ? ORDER BY name"
        ))?;

        let rows = stmt.query_map(params![owner_id, pattern], map_row)?;
        let mut patients: Vec<Patient> = rows.map(|r| Patient::try_from(r?)).collect::<DbResult<_>>()?;

        let query_lower = query.to_lowercase();
        patients.sort_by(|a, b| {
            let score_a = strsim::jaro_winkler(&a.name.to_lowercase(), &query_lower);
            let score_b = strsim::jaro_winkler(&b.name.to_lowercase(), &query_lower);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        patients.truncate(limit);
        Ok(patients)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut patient = Patient::new("user-1".into(), "Maria Silva".into());
        patient.phone = Some("+55 11 91234-5678".into());
        patient.goal = Some("Weight loss".into());

        db.insert_patient(&patient).unwrap();

        let retrieved = db.get_patient(&patient.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved.name, "Maria Silva");
        assert_eq!(retrieved.status, PatientStatus::New);
        assert_eq!(retrieved.phone, Some("+55 11 91234-5678".into()));
    }

    #[test]
    fn test_get_scoped_by_owner() {
        let db = setup_db();

        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();

        assert!(db.get_patient(&patient.id, "user-2").unwrap().is_none());
    }

    #[test]
    fn test_update_patient() {
        let db = setup_db();

        let mut patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();

        patient.status = PatientStatus::Linked;
        patient.restrictions = Some("Lactose intolerant".into());
        db.update_patient(&patient).unwrap();

        let retrieved = db.get_patient(&patient.id, "user-1").unwrap().unwrap();
        assert_eq!(retrieved.status, PatientStatus::Linked);
        assert_eq!(retrieved.restrictions, Some("Lactose intolerant".into()));
    }

    #[test]
    fn test_search_ranks_near_exact_first() {
        let db = setup_db();

        for name in ["Mariana Costa", "Maria Silva", "Ana Maria"] {
            db.insert_patient(&Patient::new("user-1".into(), name.into()))
                .unwrap();
        }

        let results = db.search_patients("user-1", "Maria", 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, "Maria Silva");
    }

    #[test]
    fn test_delete_patient() {
        let db = setup_db();

        let patient = Patient::new("user-1".into(), "Maria".into());
        db.insert_patient(&patient).unwrap();

        assert!(db.delete_patient(&patient.id).unwrap());
        assert!(db.get_patient(&patient.id, "user-1").unwrap().is_none());
    }
}
