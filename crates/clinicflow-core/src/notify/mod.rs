//! Outbound patient notifications: follow-up webhook and contact links.

mod contact;
mod follow_up;

pub use contact::*;
pub use follow_up::*;

use thiserror::Error;

/// Notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
