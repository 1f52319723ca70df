// src/handlers/club.rs

use axum::{extract::State, Json};

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::club::{ClubData, ClubDataInput},
};

// GET /api/club
pub async fn get_club_data(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<ClubData>, AppError> {
    Ok(Json(app_state.data_service.get_club_data(user_id).await?))
}

// PUT /api/club
pub async fn save_club_data(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<ClubDataInput>,
) -> Result<Json<ClubData>, AppError> {
    Ok(Json(app_state.data_service.save_club_data(user_id, &payload).await?))
}
