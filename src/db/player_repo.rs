// src/db/player_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::player::{Player, PlayerInput, PlayerMatchStats, RecordPlayerStatsPayload},
};

#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Elenco do usuário, opcionalmente filtrado por time.
    pub async fn list(&self, user_id: Uuid, team_id: Option<Uuid>) -> Result<Vec<Player>, AppError> {
        let players = sqlx::query_as::<_, Player>(
            r#"
            SELECT * FROM players
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR team_id = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Player>, AppError> {
        let players = sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE team_id = $1 ORDER BY name ASC",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Player>, AppError> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    pub async fn create(&self, user_id: Uuid, name: &str, input: &PlayerInput) -> Result<Player, AppError> {
        let skills = input.skills.unwrap_or_default();

        let player = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (
                user_id, team_id, name, jersey_number, position, age, nationality, birth_date,
                goals, assists, minutes, yellow_cards, red_cards, shots, passes, duels_won,
                skill_technical, skill_physical, skill_tactical, skill_mental,
                fitness, medical_clearance, injuries, notes, photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(input.team_id)
        .bind(name)
        .bind(input.jersey_number)
        .bind(input.position.as_deref())
        .bind(input.age)
        .bind(input.nationality.as_deref())
        .bind(input.birth_date)
        .bind(input.goals.unwrap_or(0))
        .bind(input.assists.unwrap_or(0))
        .bind(input.minutes.unwrap_or(0))
        .bind(input.yellow_cards.unwrap_or(0))
        .bind(input.red_cards.unwrap_or(0))
        .bind(input.shots.unwrap_or(0))
        .bind(input.passes.unwrap_or(0))
        .bind(input.duels_won.unwrap_or(0))
        .bind(skills.technical.unwrap_or(0))
        .bind(skills.physical.unwrap_or(0))
        .bind(skills.tactical.unwrap_or(0))
        .bind(skills.mental.unwrap_or(0))
        .bind(input.fitness.unwrap_or(100))
        .bind(input.medical_clearance.unwrap_or(true))
        .bind(input.injuries.clone().unwrap_or_default())
        .bind(input.notes.as_deref())
        .bind(input.photo_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(player)
    }

    /// Atualização parcial: `None` mantém o valor atual da coluna.
    pub async fn update(&self, user_id: Uuid, id: Uuid, input: &PlayerInput) -> Result<Option<Player>, AppError> {
        let skills = input.skills.unwrap_or_default();

        let player = sqlx::query_as::<_, Player>(
            r#"
            UPDATE players SET
                team_id = COALESCE($3, team_id),
                name = COALESCE($4, name),
                jersey_number = COALESCE($5, jersey_number),
                position = COALESCE($6, position),
                age = COALESCE($7, age),
                nationality = COALESCE($8, nationality),
                birth_date = COALESCE($9, birth_date),
                goals = COALESCE($10, goals),
                assists = COALESCE($11, assists),
                minutes = COALESCE($12, minutes),
                yellow_cards = COALESCE($13, yellow_cards),
                red_cards = COALESCE($14, red_cards),
                shots = COALESCE($15, shots),
                passes = COALESCE($16, passes),
                duels_won = COALESCE($17, duels_won),
                skill_technical = COALESCE($18, skill_technical),
                skill_physical = COALESCE($19, skill_physical),
                skill_tactical = COALESCE($20, skill_tactical),
                skill_mental = COALESCE($21, skill_mental),
                fitness = COALESCE($22, fitness),
                medical_clearance = COALESCE($23, medical_clearance),
                injuries = COALESCE($24, injuries),
                notes = COALESCE($25, notes),
                photo_url = COALESCE($26, photo_url),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.team_id)
        .bind(input.name.as_deref())
        .bind(input.jersey_number)
        .bind(input.position.as_deref())
        .bind(input.age)
        .bind(input.nationality.as_deref())
        .bind(input.birth_date)
        .bind(input.goals)
        .bind(input.assists)
        .bind(input.minutes)
        .bind(input.yellow_cards)
        .bind(input.red_cards)
        .bind(input.shots)
        .bind(input.passes)
        .bind(input.duels_won)
        .bind(skills.technical)
        .bind(skills.physical)
        .bind(skills.tactical)
        .bind(skills.mental)
        .bind(input.fitness)
        .bind(input.medical_clearance)
        .bind(input.injuries.clone())
        .bind(input.notes.as_deref())
        .bind(input.photo_url.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ESTATÍSTICAS POR PARTIDA
    // =========================================================================

    pub async fn stats_for_players(&self, player_ids: &[Uuid]) -> Result<Vec<PlayerMatchStats>, AppError> {
        if player_ids.is_empty() {
            return Ok(Vec::new());
        }

        let stats = sqlx::query_as::<_, PlayerMatchStats>(
            "SELECT * FROM player_stats WHERE player_id = ANY($1)",
        )
        .bind(player_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    // Uma linha por (jogador, partida); registrar de novo sobrescreve.
    pub async fn upsert_match_stats(
        &self,
        match_id: Uuid,
        input: &RecordPlayerStatsPayload,
    ) -> Result<PlayerMatchStats, AppError> {
        let stats = sqlx::query_as::<_, PlayerMatchStats>(
            r#"
            INSERT INTO player_stats (
                player_id, match_id, goals, assists, minutes_played, rating,
                passes_attempted, passes_completed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (player_id, match_id)
            DO UPDATE SET
                goals = EXCLUDED.goals,
                assists = EXCLUDED.assists,
                minutes_played = EXCLUDED.minutes_played,
                rating = EXCLUDED.rating,
                passes_attempted = EXCLUDED.passes_attempted,
                passes_completed = EXCLUDED.passes_completed
            RETURNING *
            "#,
        )
        .bind(input.player_id)
        .bind(match_id)
        .bind(input.goals)
        .bind(input.assists)
        .bind(input.minutes_played)
        .bind(input.rating)
        .bind(input.passes_attempted)
        .bind(input.passes_completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
