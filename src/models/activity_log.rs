use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub action: String,
    pub created_at: String,
}

impl ActivityLog {
    pub fn new(group_id: String, user_id: String, action: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            user_id,
            action,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
