// tests/api_tests.rs

use std::sync::Arc;

use quiz_app::{config::Config, routes, state::AppState, storage::SqliteStorage};
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    spawn_app_with(Config::default()).await
}

async fn spawn_app_with(config: Config) -> String {
    // 1. Create a pool over a private in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    // 2. Create the local storage table and load state (seeds sample quizzes)
    let storage = SqliteStorage::new(pool)
        .await
        .expect("Failed to create local storage");
    let state = AppState::load(Arc::new(storage), config)
        .await
        .expect("Failed to load state");

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn login(client: &reqwest::Client, address: &str) -> serde_json::Value {
    client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "ada@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json")
}

fn quiz_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Ownership and borrowing",
        "timeLimit": 5,
        "questions": [
            {
                "id": "q1",
                "text": "Which type owns its buffer?",
                "options": [{"id": "a", "text": "String"}, {"id": "b", "text": "str"}],
                "correctOption": "a",
                "points": 10
            },
            {
                "text": "Can two mutable borrows overlap?",
                "options": [{"id": "a", "text": "Yes"}, {"id": "b", "text": "No"}],
                "correctOption": "b"
            }
        ]
    })
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn sample_quizzes_are_listed_without_answers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let quizzes: Vec<serde_json::Value> = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0]["title"], "JavaScript Fundamentals");
    assert_eq!(quizzes[0]["timeLimit"], 10);
    assert!(quizzes[0]["questions"][0].get("correctOption").is_none());

    let missing = client
        .get(format!("{}/api/quizzes/nope", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn login_rejects_empty_credentials() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "email": "", "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let me = client
        .get(format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status().as_u16(), 401);
}

#[tokio::test]
async fn register_then_logout() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": "grace@example.com",
            "password": "password123",
            "name": "Grace"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let me: serde_json::Value = client
        .get(format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["name"], "Grace");

    let logout = client
        .post(format!("{}/api/auth/logout", address))
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 204);

    let me = client
        .get(format!("{}/api/auth/me", address))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status().as_u16(), 401);
}

#[tokio::test]
async fn create_quiz_requires_session() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&quiz_payload("Rust"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn create_quiz_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    login(&client, &address).await;

    let mut payload = quiz_payload("   ");
    payload["questions"][0]["correctOption"] = serde_json::json!("z");

    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn quiz_crud_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let user = login(&client, &address).await;
    assert_eq!(user["id"], "user1");

    // 1. Create
    let created = client
        .post(format!("{}/api/quizzes", address))
        .json(&quiz_payload("Rust Basics"))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let id = created.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    // 2. It shows up among my quizzes, with answers
    let mine: Vec<serde_json::Value> = client
        .get(format!("{}/api/me/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["createdBy"], "user1");
    assert_eq!(mine[0]["questions"][1]["points"], 10);
    assert_eq!(mine[0]["questions"][1]["correctOption"], "b");

    // 3. Update merges fields
    let updated: serde_json::Value = client
        .put(format!("{}/api/quizzes/{}", address, id))
        .json(&serde_json::json!({ "title": "Rust Advanced", "timeLimit": 20 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["title"], "Rust Advanced");
    assert_eq!(updated["description"], "Ownership and borrowing");
    assert_eq!(updated["createdAt"], mine[0]["createdAt"]);
    assert_ne!(updated["updatedAt"], mine[0]["updatedAt"]);

    // 4. Sample quizzes belong to someone else
    let forbidden = client
        .delete(format!("{}/api/quizzes/1", address))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    // 5. Delete
    let deleted = client
        .delete(format!("{}/api/quizzes/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let gone = client
        .get(format!("{}/api/quizzes/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn leaderboard_is_empty_without_results() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let board: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard?quizId=1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(board.is_empty());
}

#[tokio::test]
async fn cors_allows_configured_origins_only() {
    let config = Config {
        cors_origins: vec!["https://quiz.example.com".to_string()],
        ..Config::default()
    };
    let address = spawn_app_with(config).await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(format!("{}/api/quizzes", address))
        .header("Origin", "https://quiz.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://quiz.example.com"
    );

    let other = client
        .get(format!("{}/api/quizzes", address))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert!(other.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn quiz_text_is_stored_as_entered() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    login(&client, &address).await;

    let mut payload = quiz_payload("a < b && c");
    payload["questions"][0]["text"] = serde_json::json!("Which owns its data: Vec<String> or &[T]?");
    payload["questions"][0]["options"][0]["text"] = serde_json::json!("Vec<String>");

    let id = client
        .post(format!("{}/api/quizzes", address))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let quiz: serde_json::Value = client
        .get(format!("{}/api/quizzes/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(quiz["title"], "a < b && c");
    assert_eq!(
        quiz["questions"][0]["text"],
        "Which owns its data: Vec<String> or &[T]?"
    );
    assert_eq!(quiz["questions"][0]["options"][0]["text"], "Vec<String>");
}
