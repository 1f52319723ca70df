// src/models/player.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

// Notas de habilidade (0 a 100). No banco são colunas `skill_*`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct SkillRatings {
    #[sqlx(rename = "skill_technical")]
    pub technical: i32,
    #[sqlx(rename = "skill_physical")]
    pub physical: i32,
    #[sqlx(rename = "skill_tactical")]
    pub tactical: i32,
    #[sqlx(rename = "skill_mental")]
    pub mental: i32,
}

/// Notas na entrada: cada nota ausente mantém o valor salvo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct SkillPatch {
    #[validate(range(min = 0, max = 100))]
    pub technical: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub physical: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub tactical: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub mental: Option<i32>,
}

impl From<SkillRatings> for SkillPatch {
    fn from(s: SkillRatings) -> Self {
        Self {
            technical: Some(s.technical),
            physical: Some(s.physical),
            tactical: Some(s.tactical),
            mental: Some(s.mental),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub user_id: Uuid,
    pub team_id: Option<Uuid>,

    pub name: String,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    pub age: Option<i32>,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,

    // Contadores de desempenho
    pub goals: i32,
    pub assists: i32,
    pub minutes: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub shots: i32,
    pub passes: i32,
    pub duels_won: i32,

    #[sqlx(flatten)]
    pub skills: SkillRatings,

    // Departamento médico
    pub fitness: i32,
    pub medical_clearance: bool,
    pub injuries: Vec<String>,

    pub notes: Option<String>,
    pub photo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entrada de criação/atualização. Campos ausentes mantêm o valor salvo
/// numa atualização; `id` só é lido pelas importações.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    pub id: Option<Uuid>,
    pub team_id: Option<Uuid>,

    #[validate(length(min = 1, max = 120, message = "Name must have between 1 and 120 characters."))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 99))]
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub age: Option<i32>,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,

    #[validate(range(min = 0))]
    pub goals: Option<i32>,
    #[validate(range(min = 0))]
    pub assists: Option<i32>,
    #[validate(range(min = 0))]
    pub minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub yellow_cards: Option<i32>,
    #[validate(range(min = 0))]
    pub red_cards: Option<i32>,
    #[validate(range(min = 0))]
    pub shots: Option<i32>,
    #[validate(range(min = 0))]
    pub passes: Option<i32>,
    #[validate(range(min = 0))]
    pub duels_won: Option<i32>,

    #[validate(nested)]
    pub skills: Option<SkillPatch>,

    #[validate(range(min = 0, max = 100))]
    pub fitness: Option<i32>,
    pub medical_clearance: Option<bool>,
    pub injuries: Option<Vec<String>>,

    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&Player> for PlayerInput {
    fn from(p: &Player) -> Self {
        Self {
            id: Some(p.id),
            team_id: p.team_id,
            name: Some(p.name.clone()),
            jersey_number: p.jersey_number,
            position: p.position.clone(),
            age: p.age,
            nationality: p.nationality.clone(),
            birth_date: p.birth_date,
            goals: Some(p.goals),
            assists: Some(p.assists),
            minutes: Some(p.minutes),
            yellow_cards: Some(p.yellow_cards),
            red_cards: Some(p.red_cards),
            shots: Some(p.shots),
            passes: Some(p.passes),
            duels_won: Some(p.duels_won),
            skills: Some(p.skills.into()),
            fitness: Some(p.fitness),
            medical_clearance: Some(p.medical_clearance),
            injuries: Some(p.injuries.clone()),
            notes: p.notes.clone(),
            photo_url: p.photo_url.clone(),
        }
    }
}

// Estatísticas de um jogador em uma partida
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchStats {
    pub id: Uuid,
    pub player_id: Uuid,
    pub match_id: Uuid,
    pub goals: i32,
    pub assists: i32,
    pub minutes_played: i32,
    pub rating: f64,
    pub passes_attempted: i32,
    pub passes_completed: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPlayerStatsPayload {
    pub player_id: Uuid,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub goals: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub assists: i32,
    #[validate(range(min = 0, max = 150))]
    #[serde(default)]
    pub minutes_played: i32,
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(default)]
    pub rating: f64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub passes_attempted: i32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub passes_completed: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFilter {
    pub team_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_patch_keeps_missing_ratings_unset() {
        let input: PlayerInput = serde_json::from_str(r#"{"skills":{"technical":70}}"#).unwrap();
        assert_eq!(
            input.skills,
            Some(SkillPatch { technical: Some(70), physical: None, tactical: None, mental: None })
        );
    }
}
