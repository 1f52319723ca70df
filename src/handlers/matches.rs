// src/handlers/matches.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        matches::{
            CreateMatchEventPayload, CreateMatchPayload, Match, MatchEvent, MatchFilter,
            MatchSummary, UpdateMatchPayload,
        },
        player::{PlayerMatchStats, RecordPlayerStatsPayload},
    },
};

// GET /api/matches?teamId=
pub async fn list_matches(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(filter): Query<MatchFilter>,
) -> Json<Vec<Match>> {
    Json(app_state.data_service.get_matches(user_id, filter.team_id).await)
}

pub async fn get_match(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(app_state.data_service.get_match(user_id, id).await?))
}

pub async fn create_match(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<CreateMatchPayload>,
) -> Result<(StatusCode, Json<Match>), AppError> {
    let created = app_state.data_service.create_match(user_id, &payload).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_match(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateMatchPayload>,
) -> Result<Json<Match>, AppError> {
    let updated = app_state.data_service.update_match(user_id, id, &payload).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok(Json(updated))
}

pub async fn delete_match(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.data_service.delete_match(user_id, id).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  EVENTOS, RESUMO E ESTATÍSTICAS DE JOGADORES
// =============================================================================

pub async fn list_events(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchEvent>>, AppError> {
    Ok(Json(app_state.data_service.list_match_events(user_id, id).await?))
}

pub async fn add_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<CreateMatchEventPayload>,
) -> Result<(StatusCode, Json<MatchEvent>), AppError> {
    let event = app_state.data_service.add_match_event(user_id, id, &payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn match_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(app_state.data_service.match_summary(user_id, id).await?))
}

pub async fn record_player_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<RecordPlayerStatsPayload>,
) -> Result<Json<PlayerMatchStats>, AppError> {
    let stats = app_state.data_service.record_player_stats(user_id, id, &payload).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok(Json(stats))
}
