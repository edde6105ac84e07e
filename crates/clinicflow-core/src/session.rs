//! Request session context.

use serde::{Deserialize, Serialize};

/// The authenticated user on whose behalf an operation runs.
///
/// Authentication itself is external; this value is passed explicitly to
/// owner-scoped operations instead of living in global state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
