//! Saved report database operations.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::SavedReport;

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedReport> {
    Ok(SavedReport {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        question: row.get(3)?,
        result: row.get(4)?,
        visualization: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Database {
    /// Insert a new saved report.
    pub fn insert_report(&self, report: &SavedReport) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO saved_reports (id, owner_id, title, question, result, visualization, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                report.id,
                report.owner_id,
                report.title,
                report.question,
                report.result,
                report.visualization,
                report.created_at,
            ],
        )?;
        Ok(())
    }

    /// List saved reports for an owner, most recent first.
    pub fn list_reports(&self, owner_id: &str) -> DbResult<Vec<SavedReport>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, question, result, visualization, created_at \
             FROM saved_reports WHERE owner_id = ? ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([owner_id], map_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a saved report.
    pub fn delete_report(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM saved_reports WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
