// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::cache::{Clock, SystemClock},
    db::{
        AccountRepository, ClubRepository, ExportRepository, MatchRepository, PlayerRepository,
        TeamRepository, UserRepository,
    },
    services::{
        account::AccountService, ai_backend::AiBackendClient, analytics::AnalyticsService,
        assistant::AssistantService, auth::AuthService, data_management::DataManagementService,
    },
};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub ai_backend_url: String,
    pub server_addr: String,
    pub cors_allowed_origins: Vec<String>,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("⚠️ JWT_SECRET não definido, usando o segredo de desenvolvimento");
            DEV_JWT_SECRET.to_string()
        });

        let ai_backend_url = env::var("AI_ASSISTANT_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| {
                vec!["http://localhost:5173".to_string(), "http://localhost:3000".to_string()]
            });

        let cache_ttl_secs = match env::var("ANALYTICS_CACHE_TTL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ANALYTICS_CACHE_TTL_SECS inválido: {raw}"))?,
            Err(_) => 300,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            ai_backend_url,
            server_addr,
            cors_allowed_origins,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

// O estado compartilhado, montado uma vez na inicialização
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub data_service: DataManagementService,
    pub analytics_service: AnalyticsService,
    pub ai_backend: AiBackendClient,
    pub assistant_service: AssistantService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config, Arc::new(SystemClock))
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let user_repo = UserRepository::new(db_pool.clone());
        let account_repo = AccountRepository::new(db_pool.clone());
        let team_repo = TeamRepository::new(db_pool.clone());
        let player_repo = PlayerRepository::new(db_pool.clone());
        let match_repo = MatchRepository::new(db_pool.clone());
        let club_repo = ClubRepository::new(db_pool.clone());
        let export_repo = ExportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            account_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let account_service = AccountService::new(user_repo, account_repo);
        let data_service = DataManagementService::new(
            player_repo.clone(),
            team_repo.clone(),
            match_repo.clone(),
            club_repo,
            export_repo,
            config.cache_ttl,
            clock.clone(),
        );
        let analytics_service =
            AnalyticsService::new(team_repo, match_repo, player_repo, config.cache_ttl, clock);

        let http_client = reqwest::Client::builder()
            .build()
            .context("falha ao criar o cliente HTTP")?;
        let ai_backend = AiBackendClient::new(http_client, config.ai_backend_url.clone());
        let assistant_service = AssistantService::new(ai_backend.clone());

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            account_service,
            data_service,
            analytics_service,
            ai_backend,
            assistant_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
