// src/handlers/ai_proxy.rs

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::chat::{ChatPayload, TeamDataPayload},
    services::ai_backend::{BackendHealth, UpstreamReply},
};

// Envelope de sucesso com o status do backend
fn relay(reply: UpstreamReply) -> (StatusCode, Json<Value>) {
    (reply.status, Json(json!({ "success": true, "data": reply.data })))
}

// POST /api/v1/ai-proxy/chat
#[utoipa::path(
    post,
    path = "/api/v1/ai-proxy/chat",
    tag = "AI Proxy",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Resposta do backend de IA em `data`"),
        (status = 401, description = "Não autorizado"),
        (status = 503, description = "Backend de IA inacessível")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn chat(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<ChatPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;
    let reply = app_state
        .ai_backend
        .chat(user_id, &payload.message, payload.context)
        .await?;
    Ok(relay(reply))
}

// GET /api/v1/ai-proxy/team-data
#[utoipa::path(
    get,
    path = "/api/v1/ai-proxy/team-data",
    tag = "AI Proxy",
    responses(
        (status = 200, description = "Dados do time vindos do backend de IA"),
        (status = 503, description = "Backend de IA inacessível")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_team_data(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user_id): AuthenticatedUser,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ok(relay(app_state.ai_backend.get_team_data().await?))
}

// POST /api/v1/ai-proxy/team-data
#[utoipa::path(
    post,
    path = "/api/v1/ai-proxy/team-data",
    tag = "AI Proxy",
    request_body = TeamDataPayload,
    responses(
        (status = 200, description = "Status repassado do backend de IA"),
        (status = 503, description = "Backend de IA inacessível")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn post_team_data(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user_id): AuthenticatedUser,
    AppJson(payload): AppJson<TeamDataPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    Ok(relay(app_state.ai_backend.post_team_data(&payload.team_data).await?))
}

// GET /api/v1/ai-proxy/health
pub async fn health(State(app_state): State<AppState>) -> Json<BackendHealth> {
    Json(app_state.ai_backend.health().await)
}
