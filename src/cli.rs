use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::user::ADMIN_ROLE;

/// Seed a user and print their invite code. Pass `admin = true` to grant the
/// administrator role used by the approval endpoints.
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = Uuid::new_v4().to_string();
    let invite_code = Uuid::new_v4().to_string();
    let role = if admin { ADMIN_ROLE } else { "user" };
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, name, invite_code, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(&invite_code)
    .bind(role)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    println!("Created user:");
    println!("  ID: {}", id);
    println!("  Name: {}", name);
    println!("  Role: {}", role);
    println!("  Invite Code: {}", invite_code);

    Ok(())
}
