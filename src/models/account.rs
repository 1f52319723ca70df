// src/models/account.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sport: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(custom(function = "validate_sport"))]
    pub sport: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

fn validate_sport(sport: &str) -> Result<(), validator::ValidationError> {
    match sport {
        "soccer" | "futsal" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_sport")),
    }
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    match role {
        "player" | "coach" | "manager" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_role")),
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub theme: String,
    pub language: String,
    pub timezone: String,
    pub date_format: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub match_reminders: bool,
    pub training_alerts: bool,
    pub team_updates: bool,
    pub analytics_reports: bool,
    pub marketing_emails: bool,
    pub profile_visibility: String,
    pub show_email: bool,
    pub show_phone: bool,
    pub data_sharing: bool,
    pub analytics_tracking: bool,
    pub auto_save: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSettings {
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            theme: "light".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            email_notifications: true,
            push_notifications: true,
            match_reminders: true,
            training_alerts: true,
            team_updates: true,
            analytics_reports: false,
            marketing_emails: false,
            profile_visibility: "team".to_string(),
            show_email: false,
            show_phone: false,
            data_sharing: false,
            analytics_tracking: true,
            auto_save: true,
            updated_at: None,
        }
    }

    /// Aplica uma atualização parcial por cima dos valores atuais.
    pub fn merge(mut self, patch: UpdateSettingsPayload) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $( if let Some(v) = patch.$field { self.$field = v; } )*
            };
        }
        take!(
            theme, language, timezone, date_format, email_notifications,
            push_notifications, match_reminders, training_alerts, team_updates,
            analytics_reports, marketing_emails, profile_visibility, show_email,
            show_phone, data_sharing, analytics_tracking, auto_save
        );
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[validate(custom(function = "validate_theme"))]
    pub theme: Option<String>,
    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub match_reminders: Option<bool>,
    pub training_alerts: Option<bool>,
    pub team_updates: Option<bool>,
    pub analytics_reports: Option<bool>,
    pub marketing_emails: Option<bool>,
    #[validate(custom(function = "validate_visibility"))]
    pub profile_visibility: Option<String>,
    pub show_email: Option<bool>,
    pub show_phone: Option<bool>,
    pub data_sharing: Option<bool>,
    pub analytics_tracking: Option<bool>,
    pub auto_save: Option<bool>,
}

fn validate_theme(theme: &str) -> Result<(), validator::ValidationError> {
    match theme {
        "light" | "dark" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_theme")),
    }
}

fn validate_visibility(visibility: &str) -> Result<(), validator::ValidationError> {
    match visibility {
        "public" | "team" | "private" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_visibility")),
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub plan_id: String,
    pub plan_name: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    pub price_cents: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub teams: i64,
    pub players: i64,
    pub matches: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub teams: i64,
    pub players: i64,
    pub matches: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub plan_id: String,
    pub plan_name: String,
    pub status: String,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub price_cents: i64,
    pub currency: String,
    pub limits: PlanLimits,
    pub usage: Usage,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 6))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountPayload {
    pub confirmation: String,
}
