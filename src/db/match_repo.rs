// src/db/match_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::matches::{
        CreateMatchEventPayload, CreateMatchPayload, Match, MatchEvent, MatchStatus,
        UpdateMatchPayload,
    },
};

#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mais recentes primeiro
    pub async fn list(&self, user_id: Uuid, team_id: Option<Uuid>) -> Result<Vec<Match>, AppError> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR team_id = $2)
            ORDER BY match_date DESC
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Match>, AppError> {
        let found = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found)
    }

    /// Partidas encerradas de um time, opcionalmente a partir de uma data.
    pub async fn completed_for_team(
        &self,
        team_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Match>, AppError> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE team_id = $1
              AND status = $2
              AND ($3::timestamptz IS NULL OR match_date >= $3)
            ORDER BY match_date ASC
            "#,
        )
        .bind(team_id)
        .bind(MatchStatus::Completed)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    pub async fn create(&self, user_id: Uuid, input: &CreateMatchPayload) -> Result<Match, AppError> {
        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (
                user_id, team_id, match_date, home_team, away_team, home_score, away_score,
                is_home, venue, competition, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(input.team_id)
        .bind(input.match_date)
        .bind(&input.home_team)
        .bind(&input.away_team)
        .bind(input.home_score)
        .bind(input.away_score)
        .bind(input.is_home)
        .bind(input.venue.as_deref())
        .bind(input.competition.as_deref())
        .bind(input.status)
        .bind(input.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &UpdateMatchPayload,
    ) -> Result<Option<Match>, AppError> {
        let updated = sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches SET
                team_id = COALESCE($3, team_id),
                match_date = COALESCE($4, match_date),
                home_team = COALESCE($5, home_team),
                away_team = COALESCE($6, away_team),
                home_score = COALESCE($7, home_score),
                away_score = COALESCE($8, away_score),
                is_home = COALESCE($9, is_home),
                venue = COALESCE($10, venue),
                competition = COALESCE($11, competition),
                status = COALESCE($12, status),
                notes = COALESCE($13, notes),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.team_id)
        .bind(input.match_date)
        .bind(input.home_team.as_deref())
        .bind(input.away_team.as_deref())
        .bind(input.home_score)
        .bind(input.away_score)
        .bind(input.is_home)
        .bind(input.venue.as_deref())
        .bind(input.competition.as_deref())
        .bind(input.status)
        .bind(input.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  EVENTOS (gols e cartões)
    // =========================================================================

    pub async fn add_event(
        &self,
        match_id: Uuid,
        input: &CreateMatchEventPayload,
    ) -> Result<MatchEvent, AppError> {
        let event = sqlx::query_as::<_, MatchEvent>(
            r#"
            INSERT INTO match_events (match_id, minute, kind, side, player_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(match_id)
        .bind(input.minute)
        .bind(input.kind)
        .bind(input.side)
        .bind(input.player_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn list_events(&self, match_id: Uuid) -> Result<Vec<MatchEvent>, AppError> {
        let events = sqlx::query_as::<_, MatchEvent>(
            "SELECT * FROM match_events WHERE match_id = $1 ORDER BY minute ASC, created_at ASC",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
