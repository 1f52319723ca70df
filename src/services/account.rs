// src/services/account.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AccountRepository, UserRepository},
    models::account::{
        ChangePasswordPayload, PlanLimits, Profile, SubscriptionInfo, UpdateProfilePayload,
        UpdateSettingsPayload, UserSettings,
    },
    services::auth::{hash_password, verify_password},
};

const DELETE_CONFIRMATION: &str = "DELETE";

#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    accounts: AccountRepository,
}

impl AccountService {
    pub fn new(users: UserRepository, accounts: AccountRepository) -> Self {
        Self { users, accounts }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, AppError> {
        self.accounts
            .find_profile(user_id)
            .await?
            .ok_or(AppError::NotFound("Profile"))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<Profile, AppError> {
        payload.validate()?;
        self.accounts
            .update_profile(user_id, payload)
            .await?
            .ok_or(AppError::NotFound("Profile"))
    }

    pub async fn get_settings(&self, user_id: Uuid) -> Result<UserSettings, AppError> {
        self.accounts.get_settings(user_id).await
    }

    // Lê o atual (ou os padrões), aplica o patch e grava o registro inteiro
    pub async fn update_settings(
        &self,
        user_id: Uuid,
        payload: UpdateSettingsPayload,
    ) -> Result<UserSettings, AppError> {
        payload.validate()?;
        let current = self.accounts.get_settings(user_id).await?;
        self.accounts.save_settings(&current.merge(payload)).await
    }

    pub async fn subscription(&self, user_id: Uuid) -> Result<SubscriptionInfo, AppError> {
        let usage = self.accounts.usage(user_id).await?;
        let info = match self.accounts.find_subscription(user_id).await? {
            Some(row) => SubscriptionInfo {
                limits: plan_limits(&row.plan_id),
                plan_id: row.plan_id,
                plan_name: row.plan_name,
                status: row.status,
                current_period_start: Some(row.current_period_start),
                current_period_end: Some(row.current_period_end),
                cancel_at_period_end: row.cancel_at_period_end,
                price_cents: row.price_cents,
                currency: row.currency,
                usage,
            },
            // Sem assinatura salva: plano gratuito
            None => SubscriptionInfo {
                plan_id: "free".to_string(),
                plan_name: "Free".to_string(),
                status: "active".to_string(),
                current_period_start: None,
                current_period_end: None,
                cancel_at_period_end: false,
                price_cents: 0,
                currency: "USD".to_string(),
                limits: plan_limits("free"),
                usage,
            },
        };
        Ok(info)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        payload: &ChangePasswordPayload,
    ) -> Result<(), AppError> {
        payload.validate()?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let hashed = hash_password(&payload.new_password).await?;
        self.users.update_password(user_id, &hashed).await?;
        tracing::info!(%user_id, "senha alterada");
        Ok(())
    }

    pub async fn delete_account(&self, user_id: Uuid, confirmation: &str) -> Result<(), AppError> {
        if confirmation != DELETE_CONFIRMATION {
            return Err(AppError::BadRequest(format!(
                "Type {DELETE_CONFIRMATION} to confirm account deletion."
            )));
        }
        if !self.users.delete(user_id).await? {
            return Err(AppError::NotFound("User"));
        }
        tracing::warn!(%user_id, "conta removida");
        Ok(())
    }
}

/// Limites por plano; -1 significa ilimitado.
pub fn plan_limits(plan_id: &str) -> PlanLimits {
    match plan_id {
        "pro" => PlanLimits { teams: 10, players: 100, matches: 50 },
        "enterprise" => PlanLimits { teams: -1, players: -1, matches: -1 },
        _ => PlanLimits { teams: 1, players: 25, matches: 10 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_plans_get_free_limits() {
        assert_eq!(plan_limits("free"), PlanLimits { teams: 1, players: 25, matches: 10 });
        assert_eq!(plan_limits("legacy"), plan_limits("free"));
        assert_eq!(plan_limits("enterprise").players, -1);
    }

    #[test]
    fn settings_patch_only_touches_given_fields() {
        let user = Uuid::new_v4();
        let merged = UserSettings::defaults(user).merge(UpdateSettingsPayload {
            theme: Some("dark".into()),
            marketing_emails: Some(true),
            ..Default::default()
        });
        assert_eq!(merged.theme, "dark");
        assert!(merged.marketing_emails);
        assert_eq!(merged.language, "en");
        assert!(merged.auto_save);
    }

    #[test]
    fn invalid_settings_values_fail_validation() {
        let patch = UpdateSettingsPayload { theme: Some("neon".into()), ..Default::default() };
        assert!(patch.validate().is_err());
        let patch = UpdateSettingsPayload {
            profile_visibility: Some("everyone".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
