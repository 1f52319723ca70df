// src/handlers/account.rs

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    common::{error::AppError, json::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::account::{
        ChangePasswordPayload, DeleteAccountPayload, Profile, SubscriptionInfo,
        UpdateProfilePayload, UpdateSettingsPayload, UserSettings,
    },
};

pub async fn get_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(app_state.account_service.get_profile(user_id).await?))
}

pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<UpdateProfilePayload>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(app_state.account_service.update_profile(user_id, &payload).await?))
}

pub async fn get_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(app_state.account_service.get_settings(user_id).await?))
}

pub async fn update_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<UpdateSettingsPayload>,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(app_state.account_service.update_settings(user_id, payload).await?))
}

pub async fn get_subscription(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<SubscriptionInfo>, AppError> {
    Ok(Json(app_state.account_service.subscription(user_id).await?))
}

pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    app_state.account_service.change_password(user_id, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_account(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(payload): AppJson<DeleteAccountPayload>,
) -> Result<StatusCode, AppError> {
    app_state
        .account_service
        .delete_account(user_id, &payload.confirmation)
        .await?;
    app_state.analytics_service.clear_cache(user_id);
    app_state.assistant_service.clear_history(user_id);
    Ok(StatusCode::NO_CONTENT)
}
