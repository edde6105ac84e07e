//! Loyalty plan models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name of the marker plan representing a single unbundled visit.
///
/// A plan with this exact name is excluded from quota enforcement and from
/// revenue-ledger booking.
pub const MARKER_PLAN_NAME: &str = "Consulta Avulsa";

/// A purchasable bundle of consultations over a time window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyPlan {
    /// UUID, generated locally
    pub id: String,
    /// Plan name (display and marker detection)
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
    /// Purchase price
    pub price: Decimal,
    /// Number of consultations included per cycle; 0 means uncapped
    pub consultation_quota: u32,
    /// Length of a cycle in months
    pub duration_months: u32,
}

impl LoyaltyPlan {
    /// Create a new plan with required fields.
    pub fn new(name: String, price: Decimal, consultation_quota: u32, duration_months: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description: None,
            price,
            consultation_quota,
            duration_months,
        }
    }

    /// Create the marker plan for single unbundled visits.
    pub fn marker(price: Decimal) -> Self {
        Self::new(MARKER_PLAN_NAME.into(), price, 0, 0)
    }

    /// Whether this is the marker ("Consulta Avulsa") plan.
    pub fn is_marker(&self) -> bool {
        self.name == MARKER_PLAN_NAME
    }

    /// Whether the consultation quota applies to this plan.
    pub fn is_capped(&self) -> bool {
        !self.is_marker() && self.consultation_quota > 0
    }
}

/// Consultation usage within the current plan cycle, for UI display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanProgress {
    /// Plan the progress is counted against
    pub plan_id: String,
    /// Plan name (for warnings)
    pub plan_name: String,
    /// Completed appointments since the cycle start
    pub consultations_used: u32,
    /// Plan quota; 0 means uncapped
    pub quota: u32,
    /// Whether the plan is the marker plan
    pub marker: bool,
}

impl PlanProgress {
    /// Whether the next appointment would be the last of the cycle.
    ///
    /// Always false for marker and uncapped plans.
    pub fn is_last_session(&self) -> bool {
        !self.marker && self.quota > 0 && self.consultations_used + 1 >= self.quota
    }

    /// Whether the quota has been fully used.
    pub fn is_exhausted(&self) -> bool {
        !self.marker && self.quota > 0 && self.consultations_used >= self.quota
    }
}
