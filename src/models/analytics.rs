// src/models/analytics.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub win_percentage: f64,
    pub total_assists: i64,
    pub fouls_committed: i64,
    pub fouls_received: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPerformance {
    pub player_id: Uuid,
    pub name: String,
    pub position: String,
    pub matches_played: u32,
    pub goals: i64,
    pub assists: i64,
    pub average_rating: f64,
    pub total_minutes: i64,
    pub pass_accuracy: u32,
    pub form: u32,
}

// Um balde por mês de calendário (ano + mês).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPerformance {
    pub month: String,
    pub year: i32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals: i64,
    pub assists: i64,
    pub matches_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionStats {
    pub position: String,
    pub player_count: u32,
    pub total_goals: i64,
    pub total_assists: i64,
    pub average_rating: f64,
}
