// src/db/account_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::account::{
        Profile, SubscriptionRow, UpdateProfilePayload, Usage, UserSettings,
    },
};

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Criado junto com o usuário, dentro da mesma transação
    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<Profile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(full_name)
        .fetch_one(executor)
        .await?;

        Ok(profile)
    }

    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: &UpdateProfilePayload,
    ) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                location = COALESCE($4, location),
                bio = COALESCE($5, bio),
                avatar_url = COALESCE($6, avatar_url),
                date_of_birth = COALESCE($7, date_of_birth),
                sport = COALESCE($8, sport),
                role = COALESCE($9, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(input.full_name.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.location.as_deref())
        .bind(input.bio.as_deref())
        .bind(input.avatar_url.as_deref())
        .bind(input.date_of_birth)
        .bind(input.sport.as_deref())
        .bind(input.role.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    // Sem registro salvo, devolve os padrões.
    pub async fn get_settings(&self, user_id: Uuid) -> Result<UserSettings, AppError> {
        let settings =
            sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(settings.unwrap_or_else(|| UserSettings::defaults(user_id)))
    }

    // UPSERT (Insert or Update) do registro completo
    pub async fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings, AppError> {
        let saved = sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings (
                user_id, theme, language, timezone, date_format,
                email_notifications, push_notifications, match_reminders,
                training_alerts, team_updates, analytics_reports, marketing_emails,
                profile_visibility, show_email, show_phone, data_sharing,
                analytics_tracking, auto_save
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (user_id)
            DO UPDATE SET
                theme = EXCLUDED.theme,
                language = EXCLUDED.language,
                timezone = EXCLUDED.timezone,
                date_format = EXCLUDED.date_format,
                email_notifications = EXCLUDED.email_notifications,
                push_notifications = EXCLUDED.push_notifications,
                match_reminders = EXCLUDED.match_reminders,
                training_alerts = EXCLUDED.training_alerts,
                team_updates = EXCLUDED.team_updates,
                analytics_reports = EXCLUDED.analytics_reports,
                marketing_emails = EXCLUDED.marketing_emails,
                profile_visibility = EXCLUDED.profile_visibility,
                show_email = EXCLUDED.show_email,
                show_phone = EXCLUDED.show_phone,
                data_sharing = EXCLUDED.data_sharing,
                analytics_tracking = EXCLUDED.analytics_tracking,
                auto_save = EXCLUDED.auto_save,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(settings.user_id)
        .bind(&settings.theme)
        .bind(&settings.language)
        .bind(&settings.timezone)
        .bind(&settings.date_format)
        .bind(settings.email_notifications)
        .bind(settings.push_notifications)
        .bind(settings.match_reminders)
        .bind(settings.training_alerts)
        .bind(settings.team_updates)
        .bind(settings.analytics_reports)
        .bind(settings.marketing_emails)
        .bind(&settings.profile_visibility)
        .bind(settings.show_email)
        .bind(settings.show_phone)
        .bind(settings.data_sharing)
        .bind(settings.analytics_tracking)
        .bind(settings.auto_save)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn find_subscription(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, AppError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT plan_id, plan_name, status, current_period_start, current_period_end,
                   cancel_at_period_end, price_cents, currency
            FROM user_subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn usage(&self, user_id: Uuid) -> Result<Usage, AppError> {
        let usage = sqlx::query_as::<_, Usage>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM teams WHERE owner_id = $1) AS teams,
                (SELECT COUNT(*) FROM players WHERE user_id = $1) AS players,
                (SELECT COUNT(*) FROM matches WHERE user_id = $1) AS matches
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(usage)
    }
}
