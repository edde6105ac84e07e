//! Loyalty plan database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::LoyaltyPlan;

/// Raw row before price parsing.
struct PlanRow {
    id: String,
    name: String,
    description: Option<String>,
    price: String,
    consultation_quota: u32,
    duration_months: u32,
}

impl TryFrom<PlanRow> for LoyaltyPlan {
    type Error = DbError;

    fn try_from(row: PlanRow) -> DbResult<LoyaltyPlan> {
        let price = row
            .price
            .parse()
            .map_err(|_| DbError::Constraint(format!("invalid plan price: {}", row.price)))?;
        Ok(LoyaltyPlan {
            id: row.id,
            name: row.name,
            description: row.description,
            price,
            consultation_quota: row.consultation_quota,
            duration_months: row.duration_months,
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanRow> {
    Ok(PlanRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        consultation_quota: row.get(4)?,
        duration_months: row.get(5)?,
    })
}

impl Database {
    /// Insert a new plan.
    pub fn insert_plan(&self, plan: &LoyaltyPlan) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO plans (id, name, description, price, consultation_quota, duration_months)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                plan.id,
                plan.name,
                plan.description,
                plan.price.to_string(),
                plan.consultation_quota,
                plan.duration_months,
            ],
        )?;
        Ok(())
    }

    /// Update an existing plan.
    pub fn update_plan(&self, plan: &LoyaltyPlan) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE plans SET
                name = ?2,
                description = ?3,
                price = ?4,
                consultation_quota = ?5,
                duration_months = ?6
            WHERE id = ?1
            "#,
            params![
                plan.id,
                plan.name,
                plan.description,
                plan.price.to_string(),
                plan.consultation_quota,
                plan.duration_months,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a plan by ID.
    pub fn get_plan(&self, id: &str) -> DbResult<Option<LoyaltyPlan>> {
        self.conn
            .query_row(
                "SELECT id, name, description, price, consultation_quota, duration_months \
                 FROM plans WHERE id = ?",
                [id],
                map_row,
            )
            .optional()?
            .map(LoyaltyPlan::try_from)
            .transpose()
    }

    /// List all plans ordered by price.
    pub fn list_plans(&self) -> DbResult<Vec<LoyaltyPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, price, consultation_quota, duration_months \
             FROM plans ORDER BY CAST(price AS REAL)",
        )?;

        let rows = stmt.query_map([], map_row)?;
        rows.map(|r| LoyaltyPlan::try_from(r?)).collect()
    }

    /// Delete a plan.
    pub fn delete_plan(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM plans WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let plan = LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1);
        db.insert_plan(&plan).unwrap();

        let retrieved = db.get_plan(&plan.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Mensal");
        assert_eq!(retrieved.price, dec("500.00"));
        assert_eq!(retrieved.consultation_quota, 4);
    }

    #[test]
    fn test_price_survives_round_trip_exactly() {
        let db = setup_db();

        let plan = LoyaltyPlan::new("Trimestral".into(), dec("1349.99"), 12, 3);
        db.insert_plan(&plan).unwrap();

        let retrieved = db.get_plan(&plan.id).unwrap().unwrap();
        assert_eq!(retrieved.price, dec("1349.99"));
    }

    #[test]
    fn test_list_ordered_by_price() {
        let db = setup_db();

        db.insert_plan(&LoyaltyPlan::new("Anual".into(), dec("4000.00"), 48, 12))
            .unwrap();
        db.insert_plan(&LoyaltyPlan::marker(dec("150.00"))).unwrap();
        db.insert_plan(&LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1))
            .unwrap();

        let plans = db.list_plans().unwrap();
        let names: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Consulta Avulsa", "Mensal", "Anual"]);
    }

    #[test]
    fn test_update_plan() {
        let db = setup_db();

        let mut plan = LoyaltyPlan::new("Mensal".into(), dec("500.00"), 4, 1);
        db.insert_plan(&plan).unwrap();

        plan.price = dec("550.00");
        plan.consultation_quota = 5;
        assert!(db.update_plan(&plan).unwrap());

        let retrieved = db.get_plan(&plan.id).unwrap().unwrap();
        assert_eq!(retrieved.price, dec("550.00"));
        assert_eq!(retrieved.consultation_quota, 5);
    }

    #[test]
    fn test_delete_plan() {
        let db = setup_db();

        let plan = LoyaltyPlan::marker(dec("150.00"));
        db.insert_plan(&plan).unwrap();

        assert!(db.delete_plan(&plan.id).unwrap());
        assert!(db.get_plan(&plan.id).unwrap().is_none());
    }
}
