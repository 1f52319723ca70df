// src/handlers/analytics.rs

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::analytics::{MonthlyPerformance, PlayerPerformance, PositionStats, TeamStats},
};

// Nenhum destes falha: sem dados, a resposta é a estrutura vazia.

#[utoipa::path(
    get,
    path = "/api/analytics/team-stats",
    tag = "Analytics",
    responses(
        (status = 200, description = "Resumo de resultados do time", body = TeamStats)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn team_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<TeamStats> {
    Json(app_state.analytics_service.team_stats(user_id).await)
}

#[utoipa::path(
    get,
    path = "/api/analytics/players",
    tag = "Analytics",
    responses(
        (status = 200, description = "Desempenho por jogador", body = Vec<PlayerPerformance>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn player_performance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<PlayerPerformance>> {
    Json(app_state.analytics_service.player_performance(user_id).await)
}

#[utoipa::path(
    get,
    path = "/api/analytics/monthly",
    tag = "Analytics",
    responses(
        (status = 200, description = "Últimos 12 meses, em ordem", body = Vec<MonthlyPerformance>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn monthly_performance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<MonthlyPerformance>> {
    Json(app_state.analytics_service.monthly_performance(user_id).await)
}

#[utoipa::path(
    get,
    path = "/api/analytics/positions",
    tag = "Analytics",
    responses(
        (status = 200, description = "Agregado por posição", body = Vec<PositionStats>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn position_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<PositionStats>> {
    Json(app_state.analytics_service.position_stats(user_id).await)
}

// DELETE /api/analytics/cache
pub async fn clear_cache(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> StatusCode {
    app_state.analytics_service.clear_cache(user_id);
    StatusCode::NO_CONTENT
}
