// src/models/matches.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE match_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_event_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchEventKind {
    Goal,
    YellowCard,
    RedCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_side", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub match_date: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    // true quando o nosso time é o mandante
    pub is_home: bool,
    pub venue: Option<String>,
    pub competition: Option<String>,
    pub status: MatchStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchPayload {
    pub team_id: Option<Uuid>,
    pub match_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "required"))]
    pub home_team: String,
    #[validate(length(min = 1, message = "required"))]
    pub away_team: String,
    #[validate(range(min = 0))]
    pub home_score: Option<i32>,
    #[validate(range(min = 0))]
    pub away_score: Option<i32>,
    #[serde(default = "default_true")]
    pub is_home: bool,
    pub venue: Option<String>,
    pub competition: Option<String>,
    #[serde(default = "default_status")]
    pub status: MatchStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchPayload {
    pub team_id: Option<Uuid>,
    pub match_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "required"))]
    pub home_team: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub away_team: Option<String>,
    #[validate(range(min = 0))]
    pub home_score: Option<i32>,
    #[validate(range(min = 0))]
    pub away_score: Option<i32>,
    pub is_home: Option<bool>,
    pub venue: Option<String>,
    pub competition: Option<String>,
    pub status: Option<MatchStatus>,
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_status() -> MatchStatus {
    MatchStatus::Upcoming
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    pub minute: i32,
    pub kind: MatchEventKind,
    pub side: TeamSide,
    pub player_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchEventPayload {
    #[validate(range(min = 0, max = 130))]
    pub minute: i32,
    pub kind: MatchEventKind,
    pub side: TeamSide,
    pub player_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfStats {
    pub goals_for: u32,
    pub goals_against: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub opponent_yellow_cards: u32,
    pub opponent_red_cards: u32,
}

// Agregado por tempo de jogo, derivado da lista de eventos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub first_half: HalfStats,
    pub second_half: HalfStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilter {
    pub team_id: Option<Uuid>,
}
