//! Availability window and schedule block database operations.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::{AvailabilityWindow, ScheduleBlock};

fn map_window(row: &rusqlite::Row<'_>) -> rusqlite::Result<AvailabilityWindow> {
    Ok(AvailabilityWindow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        weekday: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        break_start: row.get(5)?,
        break_end: row.get(6)?,
    })
}

fn map_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleBlock> {
    Ok(ScheduleBlock {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        starts_at: row.get(2)?,
        ends_at: row.get(3)?,
        all_day: row.get(4)?,
        reason: row.get(5)?,
    })
}

impl Database {
    /// Insert a new availability window.
    pub fn insert_availability(&self, window: &AvailabilityWindow) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO availability (id, owner_id, weekday, start_time, end_time, break_start, break_end)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                window.id,
                window.owner_id,
                window.weekday,
                window.start_time,
                window.end_time,
                window.break_start,
                window.break_end,
            ],
        )?;
        Ok(())
    }

    /// Update an existing availability window.
    pub fn update_availability(&self, window: &AvailabilityWindow) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE availability SET
                weekday = ?2,
                start_time = ?3,
                end_time = ?4,
                break_start = ?5,
                break_end = ?6
            WHERE id = ?1
            "#,
            params![
                window.id,
                window.weekday,
                window.start_time,
                window.end_time,
                window.break_start,
                window.break_end,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// List availability windows for an owner, ordered by weekday and start.
    pub fn list_availability(&self, owner_id: &str) -> DbResult<Vec<AvailabilityWindow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, weekday, start_time, end_time, break_start, break_end \
             FROM availability WHERE owner_id = ? ORDER BY weekday, start_time",
        )?;

        let rows = stmt.query_map([owner_id], map_window)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an availability window.
    pub fn delete_availability(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM availability WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Insert a new schedule block.
    pub fn insert_schedule_block(&self, block: &ScheduleBlock) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO schedule_blocks (id, owner_id, starts_at, ends_at, all_day, reason)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                block.id,
                block.owner_id,
                block.starts_at,
                block.ends_at,
                block.all_day,
                block.reason,
            ],
        )?;
        Ok(())
    }

    /// Update an existing schedule block.
    pub fn update_schedule_block(&self, block: &ScheduleBlock) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE schedule_blocks SET
                starts_at = ?2,
                ends_at = ?3,
                all_day = ?4,
                reason = ?5
            WHERE id = ?1
            "#,
            params![block.id, block.starts_at, block.ends_at, block.all_day, block.reason],
        )?;
        Ok(rows_affected > 0)
    }

    /// List schedule blocks overlapping `[from, to)`.
    pub fn list_schedule_blocks(&self, owner_id: &str, from: &str, to: &str) -> DbResult<Vec<ScheduleBlock>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, starts_at, ends_at, all_day, reason \
             FROM schedule_blocks WHERE owner_id = ? AND ends_at > ? AND starts_at < ? \
             ORDER BY starts_at",
        )?;

        let rows = stmt.query_map([owner_id, from, to], map_block)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a schedule block.
    pub fn delete_schedule_block(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM schedule_blocks WHERE id = ?", [id])?;
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
    fn test_availability_round_trip() {
        let db = setup_db();

        let mut window = AvailabilityWindow::new("user-1".into(), 1, "08:00".into(), "17:00".into());
        window.break_start = Some("12:00".into());
        window.break_end = Some("13:00".into());
        db.insert_availability(&window).unwrap();

        let listed = db.list_availability("user-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], window);
    }

    #[test]
    fn test_availability_ordering() {
        let db = setup_db();

        db.insert_availability(&AvailabilityWindow::new("user-1".into(), 3, "08:00".into(), "12:00".into())).unwrap();
        db.insert_availability(&AvailabilityWindow::new("user-1".into(), 1, "14:00".into(), "18:00".into())).unwrap();
        db.insert_availability(&AvailabilityWindow::new("user-1".into(), 1, "08:00".into(), "12:00".into())).unwrap();

        let listed = db.list_availability("user-1").unwrap();
        let order: Vec<(u8, &str)> = listed.iter().map(|w| (w.weekday, w.start_time.as_str())).collect();
        assert_eq!(order, [(1, "08:00"), (1, "14:00"), (3, "08:00")]);
    }

    #[test]
    fn test_block_overlap_query() {
        let db = setup_db();

        let mut vacation = ScheduleBlock::new(
            "user-1".into(),
            "2026-03-10T00:00:00Z".into(),
            "2026-03-20T00:00:00Z".into(),
        );
        vacation.reason = Some("Vacation".into());
        db.insert_schedule_block(&vacation).unwrap();

        // Window overlapping the block start
        let hits = db
            .list_schedule_blocks("user-1", "2026-03-01T00:00:00Z", "2026-03-11T00:00:00Z")
            .unwrap();
        assert_eq!(hits.len(), 1);

        // Window entirely after the block
        let hits = db
            .list_schedule_blocks("user-1", "2026-03-21T00:00:00Z", "2026-03-31T00:00:00Z")
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_block_update_and_delete() {
        let db = setup_db();

        let mut block = ScheduleBlock::new(
            "user-1".into(),
            "2026-03-10T09:00:00Z".into(),
            "2026-03-10T12:00:00Z".into(),
        );
        block.all_day = false;
        db.insert_schedule_block(&block).unwrap();

        block.reason = Some("Conference".into());
        assert!(db.update_schedule_block(&block).unwrap());

        let hits = db
            .list_schedule_blocks("user-1", "2026-03-10T00:00:00Z", "2026-03-11T00:00:00Z")
            .unwrap();
        assert_eq!(hits[0].reason, Some("Conference".into()));

        assert!(db.delete_schedule_block(&block.id).unwrap());
    }
}
