// src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use teamplaymate_backend::{
    config::{AppState, Config},
    create_app,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o nível padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let server_addr = config.server_addr.clone();

    let app_state = AppState::new(config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    tracing::info!(backend = %app_state.ai_backend.base_url(), "backend de IA configurado");

    let app = create_app(app_state);

    let listener = TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("falha ao escutar em {server_addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("erro no servidor axum")?;
    Ok(())
}
