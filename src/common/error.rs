use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda resposta de erro sai no envelope `{ success: false, error }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    // Corpo JSON ausente, malformado ou com tipos errados
    #[error("Invalid request body: {0}")]
    JsonRejection(#[from] axum::extract::rejection::JsonRejection),

    // Backend de IA inacessível (falha de conexão)
    #[error("Failed to connect to AI assistant backend")]
    UpstreamUnavailable(String),

    // Backend de IA respondeu, mas com status não-2xx
    #[error("{message}")]
    UpstreamRejected { status: StatusCode, message: String },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::UpstreamUnavailable(details) => {
                tracing::warn!("AI assistant backend unreachable: {}", details);
                let body = Json(json!({
                    "success": false,
                    "error": "Failed to connect to AI assistant backend",
                    "details": details,
                }));
                return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
            }
            AppError::UpstreamRejected { status, message } => (status, message),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "This email is already in use.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid authentication token.".to_string(),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found.")),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::JsonRejection(rejection) => (rejection.status(), rejection.body_text()),

            // Todo o resto (banco, anyhow, bcrypt, jwt) vira 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe uma genérica.
            ref e => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_rejection_keeps_status() {
        let response = AppError::UpstreamRejected {
            status: StatusCode::BAD_GATEWAY,
            message: "boom".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unavailable_upstream_is_503() {
        let response = AppError::UpstreamUnavailable("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_is_404() {
        assert_eq!(
            AppError::NotFound("Player").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
