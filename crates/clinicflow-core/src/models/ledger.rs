//! Cash-flow ledger models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger category used for loyalty-plan revenue entries.
pub const PLAN_REVENUE_CATEGORY: &str = "Loyalty Plans";

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryKind {
    Revenue,
    Expense,
}

impl EntryKind {
    /// Storage string for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Revenue => "revenue",
            EntryKind::Expense => "expense",
        }
    }

    /// Parse a storage string back into a kind.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "revenue" => Some(EntryKind::Revenue),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }
}

/// A revenue or expense record in the cash flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    /// UUID, generated locally
    pub id: String,
    /// User the record belongs to
    pub owner_id: String,
    /// Revenue or expense
    pub kind: EntryKind,
    /// Amount, always positive
    pub amount: Decimal,
    /// Reporting category
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// Date the entry applies to
    pub entry_date: String,
}

impl LedgerEntry {
    /// Create a revenue entry dated now.
    pub fn revenue(owner_id: String, amount: Decimal, category: String, description: String) -> Self {
        Self::new(owner_id, EntryKind::Revenue, amount, category, description)
    }

    /// Create an expense entry dated now.
    pub fn expense(owner_id: String, amount: Decimal, category: String, description: String) -> Self {
        Self::new(owner_id, EntryKind::Expense, amount, category, description)
    }

    fn new(
        owner_id: String,
        kind: EntryKind,
        amount: Decimal,
        category: String,
        description: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            kind,
            amount,
            category,
            description,
            entry_date: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Aggregated totals over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerSummary {
    pub revenue: Decimal,
    pub expense: Decimal,
}

impl LedgerSummary {
    /// Net balance (revenue minus expense).
    pub fn net(&self) -> Decimal {
        self.revenue - self.expense
    }
}

/// A reporting category for expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
}

impl ExpenseCategory {
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
        }
    }
}
