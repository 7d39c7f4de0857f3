// tests/common/mod.rs

// Not every test binary uses every helper.
#![allow(dead_code)]

use careerprep::config::Config;
use careerprep::interview::client::InterviewClient;
use careerprep::interview::session::InterviewSessions;
use careerprep::{routes, state::AppState};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Spawns the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and a pool for seeding.
///
/// Requires a running Postgres reachable via DATABASE_URL. The interview
/// analysis service is pointed at a closed port so every remote call fails,
/// which is exactly what the best-effort tests need.
pub async fn spawn_app() -> (String, PgPool) {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        interview_api_url: "http://127.0.0.1:1".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        interview: InterviewClient::new(&config.interview_api_url),
        interview_sessions: InterviewSessions::new(),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Registers a fresh user and logs in, returning the bearer token.
pub async fn register_and_login(client: &reqwest::Client, address: &str) -> String {
    let email = format!("u_{}@example.com", &uuid::Uuid::now_v7().simple().to_string()[..12]);
    let password = "password123";

    let resp = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": password
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(resp.status().as_u16(), 201);

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

/// Seeds `n` questions of a kind and category, all with the given
/// correct choice. Returns the inserted ids.
pub async fn seed_questions(
    pool: &PgPool,
    exam_kind: &str,
    category: &str,
    n: usize,
    correct_choice: i32,
) -> Vec<uuid::Uuid> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = uuid::Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO questions (id, exam_kind, category, content, choices, correct_choice)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(exam_kind)
        .bind(category)
        .bind(format!("Question {}", i))
        .bind(serde_json::json!(["A", "B", "C", "D"]))
        .bind(correct_choice)
        .execute(pool)
        .await
        .expect("Failed to seed question");
        ids.push(id);
    }
    ids
}

/// Unique category name so parallel tests never share a pool.
pub fn unique_category(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::now_v7().simple().to_string()[..10])
}
