// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Players ---
        handlers::players::list_players,
        handlers::players::get_player,
        handlers::players::create_player,
        handlers::players::update_player,
        handlers::players::delete_player,

        // --- Analytics ---
        handlers::analytics::team_stats,
        handlers::analytics::player_performance,
        handlers::analytics::monthly_performance,
        handlers::analytics::position_stats,

        // --- AI Proxy ---
        handlers::ai_proxy::chat,
        handlers::ai_proxy::get_team_data,
        handlers::ai_proxy::post_team_data,
    ),
    components(
        schemas(
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::account::Profile,

            models::player::SkillRatings,
            models::player::SkillPatch,
            models::player::Player,
            models::player::PlayerInput,

            models::analytics::TeamStats,
            models::analytics::PlayerPerformance,
            models::analytics::MonthlyPerformance,
            models::analytics::PositionStats,

            models::chat::ChatPayload,
            models::chat::TeamDataPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro e login"),
        (name = "Users", description = "Dados do usuário logado"),
        (name = "Players", description = "Gestão do elenco"),
        (name = "Analytics", description = "Estatísticas do time e dos jogadores"),
        (name = "AI Proxy", description = "Repasse autenticado para o backend de IA")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_protected_routes_with_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/players/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/ai-proxy/chat"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
