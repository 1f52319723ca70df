// src/services/ai_backend.rs

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::common::error::AppError;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_UPSTREAM_ERROR: &str = "AI assistant backend error";

/// Resposta 2xx do backend de IA, com o status original.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealth {
    pub status: &'static str,
    pub backend_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Cliente do backend de IA externo. Uma tentativa por chamada, sem retry.
#[derive(Clone)]
pub struct AiBackendClient {
    client: Client,
    base_url: String,
}

impl AiBackendClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(
        &self,
        user_id: Uuid,
        message: &str,
        context: Option<Value>,
    ) -> Result<UpstreamReply, AppError> {
        let body = json!({
            "message": message,
            "context": merge_user_context(context, user_id),
        });
        let request = self.client.post(self.url("/api/chat")).json(&body);
        self.send(request).await
    }

    pub async fn get_team_data(&self) -> Result<UpstreamReply, AppError> {
        self.send(self.client.get(self.url("/api/team-data"))).await
    }

    pub async fn post_team_data(&self, team_data: &Value) -> Result<UpstreamReply, AppError> {
        self.send(self.client.post(self.url("/api/team-data")).json(team_data)).await
    }

    pub async fn health(&self) -> BackendHealth {
        let result = self
            .client
            .get(self.url("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => BackendHealth {
                status: "online",
                backend_url: self.base_url.clone(),
                details: response.json::<Value>().await.ok(),
            },
            Ok(response) => BackendHealth {
                status: "offline",
                backend_url: self.base_url.clone(),
                details: Some(json!({ "status": response.status().as_u16() })),
            },
            Err(e) => {
                tracing::warn!(error = %e, "health check do backend de IA falhou");
                BackendHealth {
                    status: "offline",
                    backend_url: self.base_url.clone(),
                    details: Some(Value::String(e.to_string())),
                }
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<UpstreamReply, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let data = response
                .json::<Value>()
                .await
                .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;
            return Ok(UpstreamReply { status, data });
        }

        // Corpo não-JSON ou sem `error` cai na mensagem padrão
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string());

        tracing::warn!(%status, %message, "backend de IA respondeu com erro");
        Err(AppError::UpstreamRejected { status, message })
    }
}

/// O `userId` autenticado sempre prevalece sobre o enviado pelo cliente.
/// Um `userId` vindo no contexto é sobrescrito, nunca repassado.
pub fn merge_user_context(context: Option<Value>, user_id: Uuid) -> Value {
    let mut map = match context {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("userId".to_string(), Value::String(user_id.to_string()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_overrides_context_user() {
        let user = Uuid::new_v4();
        let merged = merge_user_context(
            Some(json!({ "userId": "spoofed", "teamData": { "name": "Lions" } })),
            user,
        );
        assert_eq!(merged["userId"], user.to_string());
        assert_eq!(merged["teamData"]["name"], "Lions");
    }

    #[test]
    fn missing_or_scalar_context_becomes_object() {
        let user = Uuid::new_v4();
        assert_eq!(merge_user_context(None, user), json!({ "userId": user.to_string() }));
        assert_eq!(
            merge_user_context(Some(json!("text")), user),
            json!({ "userId": user.to_string() })
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = AiBackendClient::new(Client::new(), "http://localhost:5000/");
        assert_eq!(client.url("/api/chat"), "http://localhost:5000/api/chat");
    }
}
