// tests/common/mod.rs

use quizarena::{config::Config, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;

/// Spawns the app on a random port and returns its base URL, or None when
/// DATABASE_URL is not configured (the caller then skips the test).
pub async fn spawn_app() -> Option<String> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(address)
}

pub fn unique_email(prefix: &str) -> String {
    format!(
        "{}_{}@test.dev",
        prefix,
        &uuid::Uuid::new_v4().to_string()[..8]
    )
}

/// Registers an account (optionally with a role) and returns a login token.
pub async fn register_and_login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> String {
    let mut body = serde_json::json!({
        "name": "Test User",
        "email": email,
        "password": password,
    });
    if let Some(role) = role {
        body["role"] = serde_json::json!(role);
    }

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&body)
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 200);

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"]
        .as_str()
        .expect("Token not found")
        .to_string()
}
