use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum GroupStatus {
    #[serde(rename = "pending_approval")]
    #[sqlx(rename = "pending_approval")]
    PendingApproval,
    #[serde(rename = "approved")]
    #[sqlx(rename = "approved")]
    Approved,
    #[serde(rename = "rejected")]
    #[sqlx(rename = "rejected")]
    Rejected,
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupStatus::PendingApproval => write!(f, "pending_approval"),
            GroupStatus::Approved => write!(f, "approved"),
            GroupStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: GroupStatus,
    pub manager_id: String,
    pub created_at: String,
}

impl StudyGroup {
    pub fn new(manager_id: String, name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            status: GroupStatus::PendingApproval,
            manager_id,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
