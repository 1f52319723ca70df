// src/handlers/data.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::export::{ExportFile, ExportFormat, ExportRecord, ImportSummary},
};

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    fn parse(&self) -> Result<ExportFormat, AppError> {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some(_) => Err(AppError::BadRequest(
                "Unsupported file format. Please use CSV or JSON files.".to_string(),
            )),
        }
    }
}

// Download como anexo
fn attachment(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, file.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response()
}

// GET /api/data/export/players?format=csv|json
pub async fn export_players(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<FormatQuery>,
) -> Result<Response, AppError> {
    let format = query.parse()?;
    let file = app_state.data_service.export_players(user_id, format).await?;
    Ok(attachment(file))
}

// GET /api/data/export/backup
pub async fn export_backup(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Response, AppError> {
    let file = app_state.data_service.export_backup(user_id).await?;
    Ok(attachment(file))
}

// POST /api/data/import?format=csv|json  (corpo: conteúdo do arquivo)
pub async fn import_players(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<FormatQuery>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = match query.parse()? {
        ExportFormat::Csv => app_state.data_service.import_csv(user_id, &body).await?,
        ExportFormat::Json => app_state.data_service.import_json(user_id, &body).await?,
    };
    app_state.analytics_service.clear_cache(user_id);
    Ok(Json(summary))
}

// GET /api/data/history
pub async fn list_export_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<ExportRecord>>, AppError> {
    Ok(Json(app_state.data_service.list_export_history(user_id).await?))
}

// DELETE /api/data/history
pub async fn clear_export_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let removed = app_state.data_service.clear_export_history(user_id).await?;
    Ok((StatusCode::OK, Json(json!({ "removed": removed }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_csv() {
        assert_eq!(FormatQuery { format: None }.parse().unwrap(), ExportFormat::Csv);
        assert_eq!(FormatQuery { format: Some("JSON".into()) }.parse().unwrap(), ExportFormat::Json);
        assert!(FormatQuery { format: Some("pdf".into()) }.parse().is_err());
    }
}
