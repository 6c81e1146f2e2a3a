// tests/api_tests.rs

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tarubatang_backend::{config::Config, routes, state::AppState, utils::auth::hash_password};

struct TestApp {
    address: String,
    pool: SqlitePool,
}

/// Spawns the app on a random port over a single-connection in-memory SQLite
/// pool. The pool is shared with the app so tests can seed rows directly.
async fn spawn_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

/// Inserts an admin user directly and logs in through the API.
async fn seed_admin(app: &TestApp, client: &reqwest::Client) -> String {
    let email = format!("admin_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);
    let hashed = hash_password("admin-password").unwrap();

    sqlx::query(
        "INSERT INTO users (name, email, password, role, status)
         VALUES ('Admin', ?, ?, 'admin', 'active')",
    )
    .bind(&email)
    .bind(hashed)
    .execute(&app.pool)
    .await
    .unwrap();

    let login = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"email": email, "password": "admin-password"}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    login["token"].as_str().unwrap().to_string()
}

async fn register_and_login(app: &TestApp, client: &reqwest::Client) -> String {
    let email = format!("user_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);

    let resp = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Warga Desa",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let login = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"email": email, "password": "password123"}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    login["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Not an email
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Warga",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let email = format!("dup_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);

    for expected in [201, 409] {
        let response = client
            .post(format!("{}/api/auth/register", app.address))
            .json(&serde_json::json!({
                "name": "Warga",
                "email": email,
                "password": "password123"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), expected);
    }
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let email = format!("pw_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Warga",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"email": email, "password": "wrong-password"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn suspended_account_cannot_login() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let email = format!("sus_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);

    client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Warga",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    sqlx::query("UPDATE users SET status = 'suspended' WHERE email = ?")
        .bind(&email)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"email": email, "password": "password123"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn writes_require_a_token() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/destinations", app.address))
        .json(&serde_json::json!({
            "name": "Air Terjun",
            "category": "Wisata Alam",
            "description": "Deskripsi",
            "location": "Dusun Tarubatang"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn non_admin_cannot_manage_content() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&app, &client).await;

    let response = client
        .post(format!("{}/api/destinations", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "name": "Air Terjun",
            "category": "Wisata Alam",
            "description": "Deskripsi",
            "location": "Dusun Tarubatang"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_user_management_flow() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_token = seed_admin(&app, &client).await;
    let email = format!("managed_{}@tarubatang.id", &uuid::Uuid::new_v4().to_string()[..8]);

    // Create a user with a role
    let created = client
        .post(format!("{}/api/admin/users", app.address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({
            "name": "Pengelola UMKM",
            "email": email,
            "password": "password123",
            "role": "user"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let user_id = created.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap();

    // List includes it
    let users = client
        .get(format!("{}/api/admin/users", app.address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert!(
        users
            .as_array()
            .unwrap()
            .iter()
            .any(|u| u["id"].as_i64() == Some(user_id))
    );

    // Suspend it
    let updated = client
        .put(format!("{}/api/admin/users/{}", app.address, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({"status": "suspended"}))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status().as_u16(), 200);

    // Unknown status is rejected
    let bad = client
        .put(format!("{}/api/admin/users/{}", app.address, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({"status": "banished"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);

    // Delete it
    let deleted = client
        .delete(format!("{}/api/admin/users/{}", app.address, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    // Deleting it again is a 404
    let missing = client
        .delete(format!("{}/api/admin/users/{}", app.address, user_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}
