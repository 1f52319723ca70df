// src/handlers/players.rs

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
    models::player::{Player, PlayerFilter, PlayerInput},
};

// GET /api/players?teamId=
#[utoipa::path(
    get,
    path = "/api/players",
    tag = "Players",
    params(
        ("teamId" = Option<Uuid>, Query, description = "Filtra por time")
    ),
    responses(
        (status = 200, description = "Elenco (vazio se o banco falhar)", body = Vec<Player>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_players(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(filter): Query<PlayerFilter>,
) -> Json<Vec<Player>> {
    Json(app_state.data_service.get_players(user_id, filter.team_id).await)
}

// GET /api/players/{id}
#[utoipa::path(
    get,
    path = "/api/players/{id}",
    tag = "Players",
    params(("id" = Uuid, Path, description = "ID do jogador")),
    responses(
        (status = 200, body = Player),
        (status = 404, description = "Jogador não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_player(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Player>, AppError> {
    let player = app_state.data_service.get_player(user_id, id).await?;
    Ok(Json(player))
}

// POST /api/players
#[utoipa::path(
    post,
    path = "/api/players",
    tag = "Players",
    request_body = PlayerInput,
    responses(
        (status = 201, body = Player),
        (status = 400, description = "Nome ausente ou valores fora da faixa")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_player(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<PlayerInput>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let player = app_state.data_service.create_player(user_id, &payload).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok((StatusCode::CREATED, Json(player)))
}

// PUT /api/players/{id}
#[utoipa::path(
    put,
    path = "/api/players/{id}",
    tag = "Players",
    params(("id" = Uuid, Path, description = "ID do jogador")),
    request_body = PlayerInput,
    responses(
        (status = 200, body = Player),
        (status = 404, description = "Jogador não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_player(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<PlayerInput>,
) -> Result<Json<Player>, AppError> {
    let player = app_state.data_service.update_player(user_id, id, &payload).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok(Json(player))
}

// DELETE /api/players/{id}
#[utoipa::path(
    delete,
    path = "/api/players/{id}",
    tag = "Players",
    params(("id" = Uuid, Path, description = "ID do jogador")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Jogador não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_player(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.data_service.delete_player(user_id, id).await?;
    app_state.analytics_service.clear_cache(user_id);
    Ok(StatusCode::NO_CONTENT)
}
