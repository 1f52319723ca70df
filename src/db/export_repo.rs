// src/db/export_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::export::ExportRecord};

#[derive(Clone)]
pub struct ExportRepository {
    pool: PgPool,
}

impl ExportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        user_id: Uuid,
        kind: &str,
        format: &str,
        filename: &str,
    ) -> Result<ExportRecord, AppError> {
        let record = sqlx::query_as::<_, ExportRecord>(
            r#"
            INSERT INTO export_history (user_id, kind, format, filename)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(format)
        .bind(filename)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ExportRecord>, AppError> {
        let records = sqlx::query_as::<_, ExportRecord>(
            "SELECT * FROM export_history WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM export_history WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
