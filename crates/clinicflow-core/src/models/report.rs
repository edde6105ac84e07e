//! Saved report models.

use serde::{Deserialize, Serialize};

/// A saved question/result pair from the reporting assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedReport {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// The question that produced the report
    pub question: String,
    /// Result payload, stored verbatim
    pub result: String,
    /// Preferred visualization (e.g. "table", "chart")
    pub visualization: String,
    pub created_at: String,
}

impl SavedReport {
    pub fn new(owner_id: String, title: String, question: String, result: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            title,
            question,
            result,
            visualization: "table".into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_defaults() {
        let report = SavedReport::new(
            "user-1".into(),
            "Revenue by month".into(),
            "How much revenue per month?".into(),
            "[]".into(),
        );
        assert_eq!(report.visualization, "table");
        assert_eq!(report.id.len(), 36);
    }
}
