// src/db/team_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::team::{Team, TeamInput},
};

#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT * FROM teams WHERE owner_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    /// O time "principal" do usuário: o primeiro que ele criou.
    pub async fn find_primary(&self, owner_id: Uuid) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT * FROM teams WHERE owner_id = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    pub async fn create(&self, owner_id: Uuid, input: &TeamInput) -> Result<Team, AppError> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (owner_id, name, sport, description, logo_url, formation)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.sport)
        .bind(input.description.as_deref())
        .bind(input.logo_url.as_deref())
        .bind(input.formation.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(team)
    }
}
