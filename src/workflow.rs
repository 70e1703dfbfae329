//! Study-group membership workflow.
//!
//! Owns the lifecycle of a group (pending approval -> approved/rejected), its
//! member roster, and join requests. Every mutating operation runs as a single
//! transaction so membership and pending-request uniqueness hold under
//! concurrent requests; the partial unique indexes in the schema back the
//! in-transaction checks.

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{
    ActivityLog, GroupMember, GroupRole, GroupStatus, JoinRequest, JoinRequestStatus, StudyGroup,
};

#[derive(Debug)]
pub enum WorkflowError {
    /// Group (or join request) does not exist, or is not visible in its
    /// current state.
    NotFound,
    /// Caller lacks the required role or relationship.
    Unauthorized,
    /// An approved or pending group already uses this name.
    DuplicateName,
    /// A pending join request already exists for this (group, user).
    DuplicatePending,
    AlreadyMember,
    NotMember,
    /// Transition not allowed from the entity's current state.
    InvalidState,
    /// The manager must dissolve the group instead of leaving it.
    ManagerCannotLeave,
    Database(sqlx::Error),
}

impl From<sqlx::Error> for WorkflowError {
    fn from(e: sqlx::Error) -> Self {
        WorkflowError::Database(e)
    }
}

async fn log_action(
    conn: &mut SqliteConnection,
    group_id: &str,
    user_id: &str,
    action: &str,
) -> Result<(), sqlx::Error> {
    let entry = ActivityLog::new(group_id.to_string(), user_id.to_string(), action.to_string());
    sqlx::query(
        "INSERT INTO activity_logs (id, group_id, user_id, action, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&entry.id)
    .bind(&entry.group_id)
    .bind(&entry.user_id)
    .bind(&entry.action)
    .bind(&entry.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_member(
    conn: &mut SqliteConnection,
    member: &GroupMember,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&member.group_id)
    .bind(&member.user_id)
    .bind(member.role)
    .bind(&member.joined_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn member_role(
    conn: &mut SqliteConnection,
    group_id: &str,
    user_id: &str,
) -> Result<Option<GroupRole>, sqlx::Error> {
    let row: Option<(GroupRole,)> =
        sqlx::query_as("SELECT role FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await?;
    Ok(row.map(|(role,)| role))
}

/// Submit a new study group for administrative approval.
///
/// The requester is recorded as the prospective manager; no membership row is
/// created until the group is approved.
pub async fn create_study_group(
    pool: &SqlitePool,
    requester_id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<StudyGroup, WorkflowError> {
    let mut tx = pool.begin().await?;

    let (taken,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM study_groups WHERE name = ? AND status != 'rejected'")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;
    if taken > 0 {
        return Err(WorkflowError::DuplicateName);
    }

    let group = StudyGroup::new(
        requester_id.to_string(),
        name.to_string(),
        description.map(|d| d.to_string()),
    );

    sqlx::query(
        "INSERT INTO study_groups (id, name, description, status, manager_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&group.id)
    .bind(&group.name)
    .bind(&group.description)
    .bind(group.status)
    .bind(&group.manager_id)
    .bind(&group.created_at)
    .execute(&mut *tx)
    .await?;

    log_action(&mut tx, &group.id, requester_id, "submitted group for approval").await?;
    tx.commit().await?;

    Ok(group)
}

/// Approve a pending group and seat its creator as manager.
pub async fn approve_study_group(pool: &SqlitePool, group_id: &str) -> Result<(), WorkflowError> {
    let mut tx = pool.begin().await?;

    let group = fetch_group(&mut tx, group_id)
        .await?
        .ok_or(WorkflowError::NotFound)?;
    if group.status != GroupStatus::PendingApproval {
        return Err(WorkflowError::InvalidState);
    }

    sqlx::query("UPDATE study_groups SET status = 'approved' WHERE id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    let manager = GroupMember::new(
        group.id.clone(),
        group.manager_id.clone(),
        GroupRole::Manager,
    );
    insert_member(&mut tx, &manager).await?;

    log_action(&mut tx, group_id, &group.manager_id, "group approved").await?;
    tx.commit().await?;

    Ok(())
}

/// Reject a pending group. Terminal: the name becomes reusable, no
/// membership is created.
pub async fn reject_study_group(pool: &SqlitePool, group_id: &str) -> Result<(), WorkflowError> {
    let mut tx = pool.begin().await?;

    let group = fetch_group(&mut tx, group_id)
        .await?
        .ok_or(WorkflowError::NotFound)?;
    if group.status != GroupStatus::PendingApproval {
        return Err(WorkflowError::InvalidState);
    }

    sqlx::query("UPDATE study_groups SET status = 'rejected' WHERE id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    log_action(&mut tx, group_id, &group.manager_id, "group rejected").await?;
    tx.commit().await?;

    Ok(())
}

/// File a join request against an approved group.
///
/// A previously resolved request does not block re-application; only a still
/// pending one does.
pub async fn apply_to_join(
    pool: &SqlitePool,
    user_id: &str,
    group_id: &str,
) -> Result<JoinRequest, WorkflowError> {
    let mut tx = pool.begin().await?;

    let group = fetch_group(&mut tx, group_id)
        .await?
        .ok_or(WorkflowError::NotFound)?;
    if group.status != GroupStatus::Approved {
        return Err(WorkflowError::NotFound);
    }

    if member_role(&mut tx, group_id, user_id).await?.is_some() {
        return Err(WorkflowError::AlreadyMember);
    }

    let (pending,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM join_requests WHERE group_id = ? AND user_id = ? AND status = 'pending'",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    if pending > 0 {
        return Err(WorkflowError::DuplicatePending);
    }

    let request = JoinRequest::new(group_id.to_string(), user_id.to_string());
    sqlx::query(
        "INSERT INTO join_requests (id, group_id, user_id, status, requested_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&request.id)
    .bind(&request.group_id)
    .bind(&request.user_id)
    .bind(request.status)
    .bind(&request.requested_at)
    .execute(&mut *tx)
    .await?;

    log_action(&mut tx, group_id, user_id, "applied to join").await?;
    tx.commit().await?;

    Ok(request)
}

/// Resolve a pending join request. Only the group's manager may do this.
///
/// Approving creates the membership and marks the request in one transaction;
/// a second resolution attempt fails with `InvalidState`, never a duplicate
/// membership row.
pub async fn update_application_status(
    pool: &SqlitePool,
    actor_id: &str,
    group_id: &str,
    user_id: &str,
    new_status: JoinRequestStatus,
) -> Result<(), WorkflowError> {
    if new_status == JoinRequestStatus::Pending {
        return Err(WorkflowError::InvalidState);
    }

    let mut tx = pool.begin().await?;

    match member_role(&mut tx, group_id, actor_id).await? {
        Some(GroupRole::Manager) => {}
        _ => return Err(WorkflowError::Unauthorized),
    }

    let request: Option<JoinRequest> = sqlx::query_as(
        "SELECT * FROM join_requests WHERE group_id = ? AND user_id = ? ORDER BY requested_at DESC LIMIT 1",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let request = request.ok_or(WorkflowError::NotFound)?;
    if request.status != JoinRequestStatus::Pending {
        return Err(WorkflowError::InvalidState);
    }

    if new_status == JoinRequestStatus::Approved {
        if member_role(&mut tx, group_id, user_id).await?.is_some() {
            return Err(WorkflowError::AlreadyMember);
        }
        let member = GroupMember::new(group_id.to_string(), user_id.to_string(), GroupRole::Member);
        insert_member(&mut tx, &member).await?;
    }

    sqlx::query("UPDATE join_requests SET status = ? WHERE id = ?")
        .bind(new_status)
        .bind(&request.id)
        .execute(&mut *tx)
        .await?;

    let action = match new_status {
        JoinRequestStatus::Approved => "join request approved",
        _ => "join request rejected",
    };
    log_action(&mut tx, group_id, user_id, action).await?;
    tx.commit().await?;

    Ok(())
}

/// Direct-join path, no approval step. The group must exist and be approved.
pub async fn join_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<(), WorkflowError> {
    let mut tx = pool.begin().await?;

    let group = fetch_group(&mut tx, group_id)
        .await?
        .ok_or(WorkflowError::NotFound)?;
    if group.status != GroupStatus::Approved {
        return Err(WorkflowError::NotFound);
    }

    if member_role(&mut tx, group_id, user_id).await?.is_some() {
        return Err(WorkflowError::AlreadyMember);
    }

    let member = GroupMember::new(group_id.to_string(), user_id.to_string(), GroupRole::Member);
    insert_member(&mut tx, &member).await?;

    log_action(&mut tx, group_id, user_id, "joined group").await?;
    tx.commit().await?;

    Ok(())
}

/// Remove the caller's membership. The manager cannot leave; the group must
/// be dissolved instead.
pub async fn leave_study_group(
    pool: &SqlitePool,
    user_id: &str,
    group_id: &str,
) -> Result<(), WorkflowError> {
    let mut tx = pool.begin().await?;

    match member_role(&mut tx, group_id, user_id).await? {
        None => return Err(WorkflowError::NotMember),
        Some(GroupRole::Manager) => return Err(WorkflowError::ManagerCannotLeave),
        Some(GroupRole::Member) => {}
    }

    sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    log_action(&mut tx, group_id, user_id, "left group").await?;
    tx.commit().await?;

    Ok(())
}

/// Dissolve a group: manager only. Removes the roster, any join requests,
/// and the group row itself; activity logs are retained as the audit trail.
pub async fn dissolve_study_group(
    pool: &SqlitePool,
    user_id: &str,
    group_id: &str,
) -> Result<(), WorkflowError> {
    let mut tx = pool.begin().await?;

    let group = fetch_group(&mut tx, group_id)
        .await?
        .ok_or(WorkflowError::NotFound)?;
    if group.manager_id != user_id {
        return Err(WorkflowError::Unauthorized);
    }

    cascade_delete(&mut tx, group_id, user_id).await?;
    tx.commit().await?;

    Ok(())
}

/// Administrative deletion: same cascade as dissolve, but allowed for the
/// manager or an administrator. Reports success as a boolean instead of an
/// error so the route can answer 400 on refusal, matching dissolve's wider
/// sibling surface.
pub async fn delete_study_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
    is_admin: bool,
) -> Result<bool, WorkflowError> {
    let mut tx = pool.begin().await?;

    let Some(group) = fetch_group(&mut tx, group_id).await? else {
        return Ok(false);
    };
    if !is_admin && group.manager_id != user_id {
        return Ok(false);
    }

    cascade_delete(&mut tx, group_id, user_id).await?;
    tx.commit().await?;

    Ok(true)
}

async fn fetch_group(
    conn: &mut SqliteConnection,
    group_id: &str,
) -> Result<Option<StudyGroup>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM study_groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(conn)
        .await
}

async fn cascade_delete(
    tx: &mut SqliteConnection,
    group_id: &str,
    actor_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM group_members WHERE group_id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM join_requests WHERE group_id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM study_groups WHERE id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    // Audit trail survives the group.
    log_action(tx, group_id, actor_id, "group dissolved").await
}

// --- Read-only queries ---

pub async fn get_all_study_groups(pool: &SqlitePool) -> Result<Vec<StudyGroup>, WorkflowError> {
    let groups = sqlx::query_as("SELECT * FROM study_groups ORDER BY created_at")
        .fetch_all(pool)
        .await?;
    Ok(groups)
}

pub async fn get_study_group_by_id(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Option<StudyGroup>, WorkflowError> {
    let group = sqlx::query_as("SELECT * FROM study_groups WHERE id = ?")
        .bind(group_id)
        .fetch_optional(pool)
        .await?;
    Ok(group)
}

pub async fn get_user_role_in_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<Option<GroupRole>, WorkflowError> {
    let row: Option<(GroupRole,)> =
        sqlx::query_as("SELECT role FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(role,)| role))
}

/// Roster of a group; `NotFound` if the group itself is absent.
pub async fn get_study_group_members(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<GroupMember>, WorkflowError> {
    let group = get_study_group_by_id(pool, group_id).await?;
    if group.is_none() {
        return Err(WorkflowError::NotFound);
    }

    let members = sqlx::query_as("SELECT * FROM group_members WHERE group_id = ? ORDER BY joined_at")
        .bind(group_id)
        .fetch_all(pool)
        .await?;
    Ok(members)
}

pub async fn get_group_managers(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<String>, WorkflowError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT user_id FROM group_members WHERE group_id = ? AND role = 'manager'",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Groups where the user holds any role.
pub async fn get_study_groups_by_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<StudyGroup>, WorkflowError> {
    let groups = sqlx::query_as(
        r#"
        SELECT g.* FROM study_groups g
        JOIN group_members gm ON gm.group_id = g.id
        WHERE gm.user_id = ?
        ORDER BY g.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(groups)
}

pub async fn get_join_requests(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<JoinRequest>, WorkflowError> {
    let requests =
        sqlx::query_as("SELECT * FROM join_requests WHERE group_id = ? ORDER BY requested_at")
            .bind(group_id)
            .fetch_all(pool)
            .await?;
    Ok(requests)
}

pub async fn get_pending_join_requests_count(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<i64, WorkflowError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM join_requests WHERE group_id = ? AND status = 'pending'",
    )
    .bind(group_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn get_activity_logs(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<ActivityLog>, WorkflowError> {
    let logs = sqlx::query_as("SELECT * FROM activity_logs WHERE group_id = ? ORDER BY created_at")
        .bind(group_id)
        .fetch_all(pool)
        .await?;
    Ok(logs)
}

/// Admin listing of groups awaiting approval.
pub async fn view_create_study_group_requests(
    pool: &SqlitePool,
) -> Result<Vec<StudyGroup>, WorkflowError> {
    let groups = sqlx::query_as(
        "SELECT * FROM study_groups WHERE status = 'pending_approval' ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(groups)
}
