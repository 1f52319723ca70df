// src/models/team.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub sport: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub formation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    #[validate(length(min = 1, max = 120, message = "Team name is required."))]
    pub name: String,
    #[serde(default = "default_sport")]
    pub sport: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub formation: Option<String>,
}

fn default_sport() -> String {
    "soccer".to_string()
}
