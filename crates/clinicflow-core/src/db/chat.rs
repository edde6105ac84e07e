//! Assistant chat history and inbox database operations.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{ChatMessage, ChatRole, InboxMessage};

fn map_chat_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn map_inbox_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InboxMessage> {
    Ok(InboxMessage {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        patient_id: row.get(2)?,
        message: row.get(3)?,
        received_at: row.get(4)?,
        resolved: row.get(5)?,
    })
}

impl Database {
    /// Append a message to the chat history.
    pub fn save_chat_message(&self, message: &ChatMessage) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO chat_history (id, owner_id, role, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                message.id,
                message.owner_id,
                message.role.as_str(),
                message.content,
                message.created_at,
            ],
        )?;
        Ok(())
    }

    /// Fetch the chat history for an owner, oldest first.
    pub fn get_chat_history(&self, owner_id: &str) -> DbResult<Vec<ChatMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, role, content, created_at \
             FROM chat_history WHERE owner_id = ? ORDER BY created_at, id",
        )?;

        let rows = stmt.query_map([owner_id], map_chat_row)?;
        rows.map(|r| {
            let (id, owner_id, role, content, created_at) = r?;
            let role = ChatRole::parse_str(&role)
                .ok_or_else(|| DbError::Constraint(format!("unknown chat role: {role}")))?;
            Ok(ChatMessage {
                id,
                owner_id,
                role,
                content,
                created_at,
            })
        })
        .collect()
    }

    /// Delete the entire chat history for an owner.
    pub fn clear_chat_history(&self, owner_id: &str) -> DbResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM chat_history WHERE owner_id = ?", [owner_id])?;
        Ok(deleted)
    }

    /// Insert a pushed out-of-scope message into the inbox.
    pub fn insert_inbox_message(&self, message: &InboxMessage) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO inbox_messages (id, owner_id, patient_id, message, received_at, resolved)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                message.id,
                message.owner_id,
                message.patient_id,
                message.message,
                message.received_at,
                message.resolved,
            ],
        )?;
        Ok(())
    }

    /// List unresolved inbox messages, newest first.
    pub fn list_unresolved_inbox(&self, owner_id: &str) -> DbResult<Vec<InboxMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, patient_id, message, received_at, resolved \
             FROM inbox_messages WHERE owner_id = ? AND resolved = 0 \
             ORDER BY received_at DESC",
        )?;

        let rows = stmt.query_map([owner_id], map_inbox_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count unresolved inbox messages.
    pub fn unresolved_inbox_count(&self, owner_id: &str) -> DbResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM inbox_messages WHERE owner_id = ? AND resolved = 0",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// Mark an inbox message resolved.
    pub fn resolve_inbox_message(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE inbox_messages SET resolved = 1 WHERE id = ? AND resolved = 0",
            [id],
        )?;
        Ok(rows_affected > 0)
    }
}
