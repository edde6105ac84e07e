//! SQLite schema definition.

/// Complete database schema for clinicflow.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Loyalty Plans (catalog data, no owner)
-- ============================================================================

CREATE TABLE IF NOT EXISTS plans (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    price TEXT NOT NULL,                         -- decimal, stored as text
    consultation_quota INTEGER NOT NULL DEFAULT 0,
    duration_months INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_plans_name ON plans(name);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    date_of_birth TEXT,
    goal TEXT,
    restrictions TEXT,
    status TEXT NOT NULL DEFAULT 'new'
        CHECK (status IN ('new', 'linked', 'unlinked')),
    plan_id TEXT REFERENCES plans(id),
    plan_cycle_start TEXT,                       -- NULL until a plan is assigned
    registered_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_owner ON patients(owner_id);
CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    scheduled_at TEXT NOT NULL,
    kind TEXT,
    objective TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled')),
    notes TEXT,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_owner_time ON appointments(owner_id, scheduled_at);
CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);

-- ============================================================================
-- Cash Flow Ledger
-- ============================================================================

CREATE TABLE IF NOT EXISTS ledger (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('revenue', 'expense')),
    amount TEXT NOT NULL,                        -- decimal, stored as text
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    entry_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ledger_owner_date ON ledger(owner_id, entry_date);

CREATE TABLE IF NOT EXISTS expense_categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- ============================================================================
-- Schedule Administration
-- ============================================================================

CREATE TABLE IF NOT EXISTS availability (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    weekday INTEGER NOT NULL CHECK (weekday BETWEEN 0 AND 6),
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    break_start TEXT,
    break_end TEXT
);

CREATE INDEX IF NOT EXISTS idx_availability_owner ON availability(owner_id, weekday);

CREATE TABLE IF NOT EXISTS schedule_blocks (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    starts_at TEXT NOT NULL,
    ends_at TEXT NOT NULL,
    all_day INTEGER NOT NULL DEFAULT 1,
    reason TEXT
);

CREATE INDEX IF NOT EXISTS idx_blocks_owner_time ON schedule_blocks(owner_id, starts_at);

-- ============================================================================
-- Saved Reports
-- ============================================================================

CREATE TABLE IF NOT EXISTS saved_reports (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    question TEXT NOT NULL,
    result TEXT NOT NULL,
    visualization TEXT NOT NULL DEFAULT 'table',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_reports_owner ON saved_reports(owner_id, created_at);

-- ============================================================================
-- Assistant Chat History and Inbox
-- ============================================================================

CREATE TABLE IF NOT EXISTS chat_history (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_chat_owner_time ON chat_history(owner_id, created_at);

CREATE TABLE IF NOT EXISTS inbox_messages (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    message TEXT NOT NULL,
    received_at TEXT NOT NULL DEFAULT (datetime('now')),
    resolved INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_inbox_owner_resolved ON inbox_messages(owner_id, resolved);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO patients (id, owner_id, name, status) VALUES ('p1', 'u1', 'Maria', 'bogus')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO patients (id, owner_id, name, status) VALUES ('p1', 'u1', 'Maria', 'new')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_appointment_requires_patient() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Foreign key to a missing patient should fail
        let result = conn.execute(
            "INSERT INTO appointments (id, owner_id, patient_id, scheduled_at) VALUES ('a1', 'u1', 'ghost', '2026-03-01T10:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }
}
