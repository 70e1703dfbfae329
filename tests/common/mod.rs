#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let router = studyhub::build_app(pool.clone(), false).await;

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    /// Create a user in the database and return (user_id, invite_code).
    pub async fn create_user(&self, name: &str, admin: bool) -> (String, String) {
        let id = uuid::Uuid::new_v4().to_string();
        let invite_code = uuid::Uuid::new_v4().to_string();
        let role = if admin { "administrator" } else { "user" };
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
        .execute(&self.db)
        .await
        .expect("Failed to create test user");

        (id, invite_code)
    }

    /// Log in as the given user and return the session cookie string.
    pub async fn login(&self, invite_code: &str) -> String {
        let resp = self
            .post_json(
                "/login",
                &serde_json::json!({ "invite_code": invite_code }).to_string(),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        resp.headers()
            .get("set-cookie")
            .expect("Login should set a session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    /// Insert a study group directly and return its id.
    pub async fn insert_group(&self, name: &str, manager_id: &str, status: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO study_groups (id, name, description, status, manager_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(Option::<String>::None)
        .bind(status)
        .bind(manager_id)
        .bind(&now)
        .execute(&self.db)
        .await
        .expect("Failed to insert test group");

        id
    }

    /// Insert a membership row directly.
    pub async fn insert_member(&self, group_id: &str, user_id: &str, role: &str) {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .bind(&now)
        .execute(&self.db)
        .await
        .expect("Failed to insert test member");
    }

    /// Insert an approved group with its manager membership row.
    pub async fn approved_group(&self, name: &str, manager_id: &str) -> String {
        let group_id = self.insert_group(name, manager_id, "approved").await;
        self.insert_member(&group_id, manager_id, "manager").await;
        group_id
    }

    /// Send a GET request with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let req = builder.body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a POST request with a JSON body and an optional session cookie.
    pub async fn post_json(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.request(req).await
    }

    /// Send a DELETE request with an optional session cookie.
    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri).method("DELETE");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let req = builder.body(Body::empty()).unwrap();
        self.request(req).await
    }

    pub async fn member_count(&self, group_id: &str) -> i64 {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = ?")
                .bind(group_id)
                .fetch_one(&self.db)
                .await
                .unwrap();
        count
    }

    pub async fn group_status(&self, group_id: &str) -> Option<String> {
        let row: Option<(String,)> = sqlx::query_as("SELECT status FROM study_groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.db)
            .await
            .unwrap();
        row.map(|(status,)| status)
    }
}

/// Read the full response body as parsed JSON.
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body should be valid JSON")
}
