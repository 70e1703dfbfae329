use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum GroupRole {
    #[serde(rename = "manager")]
    #[sqlx(rename = "manager")]
    Manager,
    #[serde(rename = "member")]
    #[sqlx(rename = "member")]
    Member,
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupRole::Manager => write!(f, "manager"),
            GroupRole::Member => write!(f, "member"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: String,
    pub role: GroupRole,
    pub joined_at: String,
}

impl GroupMember {
    pub fn new(group_id: String, user_id: String, role: GroupRole) -> Self {
        Self {
            group_id,
            user_id,
            role,
            joined_at: Utc::now().to_rfc3339(),
        }
    }
}
