use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum JoinRequestStatus {
    #[serde(rename = "pending")]
    #[sqlx(rename = "pending")]
    Pending,
    #[serde(rename = "approved")]
    #[sqlx(rename = "approved")]
    Approved,
    #[serde(rename = "rejected")]
    #[sqlx(rename = "rejected")]
    Rejected,
}

impl std::fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinRequestStatus::Pending => write!(f, "pending"),
            JoinRequestStatus::Approved => write!(f, "approved"),
            JoinRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequest {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub status: JoinRequestStatus,
    pub requested_at: String,
}

impl JoinRequest {
    pub fn new(group_id: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            user_id,
            status: JoinRequestStatus::Pending,
            requested_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_request_status_serde_roundtrip() {
        let variants = vec![
            (JoinRequestStatus::Pending, "\"pending\""),
            (JoinRequestStatus::Approved, "\"approved\""),
            (JoinRequestStatus::Rejected, "\"rejected\""),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            let deserialized: JoinRequestStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, variant);
        }
    }
}
