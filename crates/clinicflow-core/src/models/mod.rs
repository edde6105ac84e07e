//! Domain models for the clinicflow system.

mod appointment;
mod chat;
mod ledger;
mod patient;
mod plan;
mod report;
mod schedule;

pub use appointment::*;
pub use chat::*;
pub use ledger::*;
pub use patient::*;
pub use plan::*;
pub use report::*;
pub use schedule::*;
