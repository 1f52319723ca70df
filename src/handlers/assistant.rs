// src/handlers/assistant.rs

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::chat::{AssistantMessagePayload, AssistantReply, ChatMessage},
};

// POST /api/assistant/messages
pub async fn send_message(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<AssistantMessagePayload>,
) -> Json<AssistantReply> {
    let reply = app_state
        .assistant_service
        .process_message(user_id, &payload.message, payload.context)
        .await;
    Json(reply)
}

// GET /api/assistant/history
pub async fn history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<ChatMessage>> {
    Json(app_state.assistant_service.history(user_id))
}

// DELETE /api/assistant/history
pub async fn clear_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> StatusCode {
    app_state.assistant_service.clear_history(user_id);
    StatusCode::NO_CONTENT
}

// GET /api/assistant/team-data
pub async fn load_team_data(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let data = app_state.assistant_service.load_team_data(user_id).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}
