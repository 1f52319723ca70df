// src/db/club_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::club::{ClubData, ClubDataInput},
};

#[derive(Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: Uuid) -> Result<Option<ClubData>, AppError> {
        let club = sqlx::query_as::<_, ClubData>("SELECT * FROM club_data WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(club)
    }

    // UPSERT: o registro inteiro é substituído
    pub async fn upsert(&self, user_id: Uuid, input: &ClubDataInput) -> Result<ClubData, AppError> {
        let club = sqlx::query_as::<_, ClubData>(
            r#"
            INSERT INTO club_data (
                user_id, name, founded, stadium, capacity, address, phone, email, website,
                budget, trophies, coaching_staff, medical_staff, has_training_ground,
                has_academy, has_medical_center, sponsor_name, sponsor_value, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ON CONFLICT (user_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                founded = EXCLUDED.founded,
                stadium = EXCLUDED.stadium,
                capacity = EXCLUDED.capacity,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                website = EXCLUDED.website,
                budget = EXCLUDED.budget,
                trophies = EXCLUDED.trophies,
                coaching_staff = EXCLUDED.coaching_staff,
                medical_staff = EXCLUDED.medical_staff,
                has_training_ground = EXCLUDED.has_training_ground,
                has_academy = EXCLUDED.has_academy,
                has_medical_center = EXCLUDED.has_medical_center,
                sponsor_name = EXCLUDED.sponsor_name,
                sponsor_value = EXCLUDED.sponsor_value,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.name)
        .bind(input.founded)
        .bind(input.stadium.as_deref())
        .bind(input.capacity)
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.website.as_deref())
        .bind(input.budget)
        .bind(input.trophies)
        .bind(input.coaching_staff)
        .bind(input.medical_staff)
        .bind(input.has_training_ground)
        .bind(input.has_academy)
        .bind(input.has_medical_center)
        .bind(input.sponsor_name.as_deref())
        .bind(input.sponsor_value)
        .bind(input.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(club)
    }
}
