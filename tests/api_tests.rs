//! Testes de integração da API HTTP.
//!
//! O banco nunca está acessível aqui: as rotas que dependem dele
//! exercitam o caminho degradado. O backend de IA é um servidor axum
//! local numa porta efêmera.

use axum::{
    http::{header::AUTHORIZATION, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use teamplaymate_backend::{config::AppState, create_app, create_test_state};
use tokio::net::TcpListener;
use uuid::Uuid;

// Porta sem ninguém escutando
const OFFLINE_BACKEND: &str = "http://127.0.0.1:9";

fn setup(ai_backend_url: &str) -> (TestServer, AppState) {
    let state = create_test_state(ai_backend_url).unwrap();
    let server = TestServer::new(create_app(state.clone())).unwrap();
    (server, state)
}

fn bearer(state: &AppState, user_id: Uuid) -> String {
    format!("Bearer {}", state.auth_service.create_token(user_id).unwrap())
}

/// Sobe um backend de IA falso e devolve a URL base.
async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn healthy_backend() -> Router {
    Router::new()
        .route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "content": "Play a 4-3-3 this weekend.",
                    "confidence": 80,
                    "echo": body,
                }))
            }),
        )
        .route(
            "/api/team-data",
            get(|| async { Json(json!({ "players": [{ "name": "Ana" }] })) }).post(
                |Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(json!({ "stored": body }))) },
            ),
        )
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
}

// ============================================================================
// Básico
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _) = setup(OFFLINE_BACKEND);

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (server, _) = setup(OFFLINE_BACKEND);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/analytics/team-stats"].is_object());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (server, _) = setup(OFFLINE_BACKEND);

    let response = server.get("/api/players").await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["success"], false);

    server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, "Bearer not-a-jwt")
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Proxy do backend de IA
// ============================================================================

#[tokio::test]
async fn test_chat_is_relayed_with_authenticated_user() {
    let base = spawn_backend(healthy_backend()).await;
    let (server, state) = setup(&base);
    let user_id = Uuid::new_v4();

    let response = server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, bearer(&state, user_id))
        .json(&json!({
            "message": "Which formation?",
            "context": { "userId": "someone-else", "page": "tactics" }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["content"], "Play a 4-3-3 this weekend.");
    assert_eq!(body["data"]["echo"]["message"], "Which formation?");
    assert_eq!(body["data"]["echo"]["context"]["userId"], user_id.to_string());
    assert_eq!(body["data"]["echo"]["context"]["page"], "tactics");
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let (server, state) = setup(OFFLINE_BACKEND);

    server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "message": "" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_malformed_json_body_uses_error_envelope() {
    let (server, state) = setup(OFFLINE_BACKEND);

    let response = server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .bytes("{\"message\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let response = server
        .post("/api/players")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "name": "Ana", "goals": "many" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_upstream_error_status_is_relayed() {
    let base = spawn_backend(Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::BAD_GATEWAY, Json(json!({ "error": "model overloaded" }))) }),
    ))
    .await;
    let (server, state) = setup(&base);

    let response = server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "message": "hello" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false, "error": "model overloaded" }));
}

#[tokio::test]
async fn test_upstream_error_without_message_uses_default() {
    let base = spawn_backend(Router::new().route(
        "/api/team-data",
        get(|| async { (StatusCode::NOT_FOUND, "nothing here") }),
    ))
    .await;
    let (server, state) = setup(&base);

    let response = server
        .get("/api/v1/ai-proxy/team-data")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "AI assistant backend error");
}

#[tokio::test]
async fn test_unreachable_backend_is_503() {
    let (server, state) = setup(OFFLINE_BACKEND);

    let response = server
        .post("/api/v1/ai-proxy/chat")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "message": "hello" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to connect to AI assistant backend");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_team_data_get_and_post() {
    let base = spawn_backend(healthy_backend()).await;
    let (server, state) = setup(&base);
    let token = bearer(&state, Uuid::new_v4());

    let response = server
        .get("/api/v1/ai-proxy/team-data")
        .add_header(AUTHORIZATION, token.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["players"][0]["name"], "Ana");

    let response = server
        .post("/api/v1/ai-proxy/team-data")
        .add_header(AUTHORIZATION, token)
        .json(&json!({ "teamData": { "formation": "4-4-2" } }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["stored"]["formation"], "4-4-2");
}

#[tokio::test]
async fn test_backend_health_reports_status() {
    let base = spawn_backend(healthy_backend()).await;
    let (server, _) = setup(&base);
    let body: Value = server.get("/api/v1/ai-proxy/health").await.json();
    assert_eq!(body["status"], "online");

    let (server, _) = setup(OFFLINE_BACKEND);
    let body: Value = server.get("/api/v1/ai-proxy/health").await.json();
    assert_eq!(body["status"], "offline");
}

// ============================================================================
// Assistente
// ============================================================================

#[tokio::test]
async fn test_assistant_falls_back_to_templates() {
    let (server, state) = setup(OFFLINE_BACKEND);
    let token = bearer(&state, Uuid::new_v4());

    let response = server
        .post("/api/assistant/messages")
        .add_header(AUTHORIZATION, token.clone())
        .json(&json!({ "message": "Which training drills work best?" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["source"], "keyword_templates");
    assert_eq!(body["degraded"], true);
    assert_eq!(body["confidence"], 85);

    let history: Value = server
        .get("/api/assistant/history")
        .add_header(AUTHORIZATION, token.clone())
        .await
        .json();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");

    server
        .delete("/api/assistant/history")
        .add_header(AUTHORIZATION, token.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let history: Value = server
        .get("/api/assistant/history")
        .add_header(AUTHORIZATION, token)
        .await
        .json();
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_assistant_uses_backend_when_available() {
    let base = spawn_backend(healthy_backend()).await;
    let (server, state) = setup(&base);

    let body: Value = server
        .post("/api/assistant/messages")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "message": "Which formation should we use" }))
        .await
        .json();

    assert_eq!(body["source"], "backend");
    assert_eq!(body["degraded"], false);
    assert_eq!(body["confidence"], 95);
    assert_eq!(body["content"], "Play a 4-3-3 this weekend.");
}

// ============================================================================
// Leituras degradadas e validações antes do banco
// ============================================================================

#[tokio::test]
async fn test_reads_degrade_when_database_is_down() {
    let (server, state) = setup(OFFLINE_BACKEND);
    let token = bearer(&state, Uuid::new_v4());

    let players: Value = server
        .get("/api/players")
        .add_header(AUTHORIZATION, token.clone())
        .await
        .json();
    assert_eq!(players, json!([]));

    let stats: Value = server
        .get("/api/analytics/team-stats")
        .add_header(AUTHORIZATION, token)
        .await
        .json();
    assert_eq!(stats["totalMatches"], 0);
    assert_eq!(stats["winPercentage"], 0.0);
}

#[tokio::test]
async fn test_import_rejects_unknown_format() {
    let (server, state) = setup(OFFLINE_BACKEND);

    let response = server
        .post("/api/data/import?format=pdf")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .text("whatever")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Unsupported file format. Please use CSV or JSON files.");
}

#[tokio::test]
async fn test_csv_import_counts_nameless_rows() {
    let (server, state) = setup(OFFLINE_BACKEND);
    let token = bearer(&state, Uuid::new_v4());

    let response = server
        .post("/api/data/import?format=csv")
        .add_header(AUTHORIZATION, token.clone())
        .text("Name,Position,Goals\n,Forward,3\n\n,Keeper,0\n")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "imported": 0, "failed": 0, "skipped": 2 }));

    server
        .post("/api/data/import?format=csv")
        .add_header(AUTHORIZATION, token)
        .text("Name,Position\n")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_account_requires_confirmation() {
    let (server, state) = setup(OFFLINE_BACKEND);

    let response = server
        .delete("/api/account")
        .add_header(AUTHORIZATION, bearer(&state, Uuid::new_v4()))
        .json(&json!({ "confirmation": "delete" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}
