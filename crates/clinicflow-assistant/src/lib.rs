//! Chat-assistant webhook client for clinicflow.
//!
//! The assistant runs behind an external automation webhook: the clinic
//! posts `{"message": ...}` and receives the reply as plain text, which is
//! persisted verbatim. [`MockAssistant`] provides deterministic replies for
//! tests and offline use.

pub mod client;
pub mod mock;

pub use client::*;
pub use mock::*;
