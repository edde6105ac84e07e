//! ClinicFlow Core Library
//!
//! Clinic management for a single practitioner: patient records, appointment
//! scheduling, loyalty-plan billing, and cash-flow tracking over an embedded
//! SQLite store.
//!
//! # Architecture
//!
//! ```text
//! UI action → workflow: validate → load records → decide transition
//!                                                       │
//!                                       ┌───────────────▼───────────────┐
//!                                       │     one SQLite transaction    │
//!                                       │  appointment → patient → ledger │
//!                                       └───────────────┬───────────────┘
//!                                                       │
//!                                     ┌─────────────────┴────────────────┐
//!                                     ▼                                  ▼
//!                              caller gets outcome              follow-up webhook
//!                                                              (detached, logged only)
//! ```
//!
//! # Core principle
//!
//! **Completion is terminal.** A completed (or cancelled) appointment can
//! never be completed again, so a visit books at most one revenue entry.
//!
//! # Modules
//!
//! - [`models`]: domain types (Patient, LoyaltyPlan, Appointment, LedgerEntry, ...)
//! - [`db`]: SQLite database layer, one operations file per entity
//! - [`workflow`]: completion, scheduling with quota enforcement, plan lifecycle
//! - [`notify`]: follow-up webhook client and contact deep links
//! - [`config`]: runtime configuration
//! - [`session`]: explicit request session (no global auth state)

pub mod config;
pub mod db;
pub mod models;
pub mod notify;
pub mod session;
pub mod workflow;

// Re-export commonly used types
pub use config::ClinicConfig;
pub use db::Database;
pub use models::{
    Appointment, AppointmentStatus, AvailabilityWindow, ChatMessage, ChatRole, EntryKind,
    ExpenseCategory, InboxMessage, LedgerEntry, LedgerSummary, LoyaltyPlan, Patient,
    PatientStatus, PlanProgress, SavedReport, ScheduleBlock, MARKER_PLAN_NAME,
};
pub use notify::{whatsapp_link, FollowUpClient, FollowUpPayload};
pub use session::Session;
pub use workflow::{
    assign_plan, complete_appointment, plan_progress, schedule_appointment, CompletionOutcome,
    CompletionRequest, NewAppointment, PlanAssignment, PlanTransition, WorkflowError,
};
