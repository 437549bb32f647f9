use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login session. Refresh tokens are only honoured while `valid` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub valid: bool,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, user_agent: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            valid: true,
            user_agent,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the session as logged out.
    pub fn invalidate(mut self) -> Self {
        self.valid = false;
        self.updated_at = Utc::now();
        self
    }
}
