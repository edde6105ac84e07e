//! Cash-flow ledger database operations.

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{Database, DbError, DbResult};
use crate::models::{EntryKind, ExpenseCategory, LedgerEntry, LedgerSummary};

/// Raw row before kind/amount parsing.
struct LedgerRow {
    id: String,
    owner_id: String,
    kind: String,
    amount: String,
    category: String,
    description: String,
    entry_date: String,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = DbError;

    fn try_from(row: LedgerRow) -> DbResult<LedgerEntry> {
        let kind = EntryKind::parse_str(&row.kind)
            .ok_or_else(|| DbError::Constraint(format!("unknown entry kind: {}", row.kind)))?;
        let amount = row
            .amount
            .parse()
            .map_err(|_| DbError::Constraint(format!("invalid entry amount: {}", row.amount)))?;
        Ok(LedgerEntry {
            id: row.id,
            owner_id: row.owner_id,
            kind,
            amount,
            category: row.category,
            description: row.description,
            entry_date: row.entry_date,
        })
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerRow> {
    Ok(LedgerRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        entry_date: row.get(6)?,
    })
}

impl Database {
    /// Insert a new ledger entry.
    pub fn insert_ledger_entry(&self, entry: &LedgerEntry) -> DbResult<()> {
        self.conn.execute(
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

    /// List entries dated within `[from, to)`, most recent first.
    pub fn list_ledger_between(&self, owner_id: &str, from: &str, to: &str) -> DbResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, kind, amount, category, description, entry_date \
             FROM ledger WHERE owner_id = ? AND entry_date >= ? AND entry_date < ? \
             ORDER BY entry_date DESC",
        )?;

        let rows = stmt.query_map([owner_id, from, to], map_row)?;
        rows.map(|r| LedgerEntry::try_from(r?)).collect()
    }

    /// List every entry booked for a patient-facing description match.
    ///
    /// Used by tests and reporting to locate plan-purchase entries.
    pub fn find_ledger_by_description(&self, owner_id: &str, needle: &str) -> DbResult<Vec<LedgerEntry>> {
        let pattern = format!("%{}%", needle);
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, kind, amount, category, description, entry_date \
             FROM ledger WHERE owner_id = ? AND description LIKE ? ORDER BY entry_date DESC",
        )?;

        let rows = stmt.query_map(params![owner_id, pattern], map_row)?;
        rows.map(|r| LedgerEntry::try_from(r?)).collect()
    }

    /// Sum revenue and expense totals over `[from, to)`.
    ///
    /// Amounts are decimal text; summation happens in `Decimal`, never in
    /// SQLite floating point.
    pub fn summarize_ledger(&self, owner_id: &str, from: &str, to: &str) -> DbResult<LedgerSummary> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, amount FROM ledger \
             WHERE owner_id = ? AND entry_date >= ? AND entry_date < ?",
        )?;

        let rows = stmt.query_map([owner_id, from, to], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut summary = LedgerSummary {
            revenue: Decimal::ZERO,
            expense: Decimal::ZERO,
        };
        for row in rows {
            let (kind, amount) = row?;
            let amount: Decimal = amount
                .parse()
                .map_err(|_| DbError::Constraint(format!("invalid entry amount: {amount}")))?;
            match EntryKind::parse_str(&kind) {
                Some(EntryKind::Revenue) => summary.revenue += amount,
                Some(EntryKind::Expense) => summary.expense += amount,
                None => return Err(DbError::Constraint(format!("unknown entry kind: {kind}"))),
            }
        }
        Ok(summary)
    }

    /// Delete a ledger entry.
    pub fn delete_ledger_entry(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM ledger WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Insert a new expense category.
    pub fn insert_expense_category(&self, category: &ExpenseCategory) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO expense_categories (id, name) VALUES (?1, ?2)",
            params![category.id, category.name],
        )?;
        Ok(())
    }

    /// Get an expense category by name.
    pub fn get_expense_category(&self, name: &str) -> DbResult<Option<ExpenseCategory>> {
        self.conn
            .query_row(
                "SELECT id, name FROM expense_categories WHERE name = ?",
                [name],
                |row| {
                    Ok(ExpenseCategory {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List expense categories ordered by name.
    pub fn list_expense_categories(&self) -> DbResult<Vec<ExpenseCategory>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM expense_categories ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(ExpenseCategory {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an expense category.
    pub fn delete_expense_category(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM expense_categories WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
