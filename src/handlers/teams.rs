// src/handlers/teams.rs

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::team::{Team, TeamInput},
};

pub async fn list_teams(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<Team>>, AppError> {
    Ok(Json(app_state.data_service.get_teams(user_id).await?))
}

pub async fn create_team(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<TeamInput>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    let team = app_state.data_service.create_team(user_id, &payload).await?;
    // o time principal pode ter mudado
    app_state.analytics_service.clear_cache(user_id);
    Ok((StatusCode::CREATED, Json(team)))
}
