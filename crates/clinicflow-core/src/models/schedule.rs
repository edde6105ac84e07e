//! Schedule administration models: weekly availability and blocks.

use serde::{Deserialize, Serialize};

/// A recurring weekly working window, optionally with a mid-day break.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityWindow {
    pub id: String,
    pub owner_id: String,
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    /// Window start, "HH:MM"
    pub start_time: String,
    /// Window end, "HH:MM"
    pub end_time: String,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

impl AvailabilityWindow {
    pub fn new(owner_id: String, weekday: u8, start_time: String, end_time: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            weekday,
            start_time,
            end_time,
            break_start: None,
            break_end: None,
        }
    }
}

/// A one-off period during which no appointments can be booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleBlock {
    pub id: String,
    pub owner_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub all_day: bool,
    pub reason: Option<String>,
}

impl ScheduleBlock {
    pub fn new(owner_id: String, starts_at: String, ends_at: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            starts_at,
            ends_at,
            all_day: true,
            reason: None,
        }
    }
}
