// src/services/data_management.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        cache::{Clock, TtlCache},
        error::AppError,
    },
    db::{ClubRepository, ExportRepository, MatchRepository, PlayerRepository, TeamRepository},
    models::{
        club::{ClubData, ClubDataInput},
        export::{ExportFile, ExportFormat, ExportRecord, ImportSummary},
        matches::{
            CreateMatchEventPayload, CreateMatchPayload, HalfStats, Match, MatchEvent,
            MatchEventKind, MatchSummary, TeamSide, UpdateMatchPayload,
        },
        player::{Player, PlayerInput, PlayerMatchStats, RecordPlayerStatsPayload},
        team::{Team, TeamInput},
    },
    services::csv_codec::{self, CsvError},
};

type PlayerListKey = (Uuid, Option<Uuid>);

#[derive(Clone)]
pub struct DataManagementService {
    players: PlayerRepository,
    teams: TeamRepository,
    matches: MatchRepository,
    clubs: ClubRepository,
    exports: ExportRepository,
    player_cache: TtlCache<PlayerListKey, Vec<Player>>,
}

impl DataManagementService {
    pub fn new(
        players: PlayerRepository,
        teams: TeamRepository,
        matches: MatchRepository,
        clubs: ClubRepository,
        exports: ExportRepository,
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            players,
            teams,
            matches,
            clubs,
            exports,
            player_cache: TtlCache::new(cache_ttl, clock),
        }
    }

    // =========================================================================
    //  JOGADORES
    // =========================================================================

    /// Lista o elenco. Falha no banco degrada para lista vazia.
    pub async fn get_players(&self, user_id: Uuid, team_id: Option<Uuid>) -> Vec<Player> {
        let key = (user_id, team_id);
        if let Some(cached) = self.player_cache.get(&key) {
            return cached;
        }

        match self.players.list(user_id, team_id).await {
            Ok(players) => {
                self.player_cache.insert(key, players.clone());
                players
            }
            Err(e) => {
                tracing::warn!(%user_id, error = ?e, "falha ao listar jogadores, devolvendo lista vazia");
                Vec::new()
            }
        }
    }

    pub async fn get_player(&self, user_id: Uuid, id: Uuid) -> Result<Player, AppError> {
        self.players.find(user_id, id).await?.ok_or(AppError::NotFound("Player"))
    }

    pub async fn create_player(&self, user_id: Uuid, input: &PlayerInput) -> Result<Player, AppError> {
        input.validate()?;
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::BadRequest("Player name is required.".to_string()))?;

        let player = self.players.create(user_id, name, input).await?;
        self.invalidate_players(user_id);
        Ok(player)
    }

    pub async fn update_player(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &PlayerInput,
    ) -> Result<Player, AppError> {
        input.validate()?;
        let player = self
            .players
            .update(user_id, id, input)
            .await?
            .ok_or(AppError::NotFound("Player"))?;
        self.invalidate_players(user_id);
        Ok(player)
    }

    pub async fn delete_player(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.players.delete(user_id, id).await? {
            return Err(AppError::NotFound("Player"));
        }
        self.invalidate_players(user_id);
        Ok(())
    }

    fn invalidate_players(&self, user_id: Uuid) {
        self.player_cache.remove_where(|(owner, _)| *owner == user_id);
    }

    // =========================================================================
    //  TIMES
    // =========================================================================

    pub async fn get_teams(&self, user_id: Uuid) -> Result<Vec<Team>, AppError> {
        self.teams.list_by_owner(user_id).await
    }

    pub async fn create_team(&self, user_id: Uuid, input: &TeamInput) -> Result<Team, AppError> {
        input.validate()?;
        self.teams.create(user_id, input).await
    }

    // =========================================================================
    //  PARTIDAS
    // =========================================================================

    /// Mais recentes primeiro; falha no banco degrada para lista vazia.
    pub async fn get_matches(&self, user_id: Uuid, team_id: Option<Uuid>) -> Vec<Match> {
        self.matches.list(user_id, team_id).await.unwrap_or_else(|e| {
            tracing::warn!(%user_id, error = ?e, "falha ao listar partidas, devolvendo lista vazia");
            Vec::new()
        })
    }

    pub async fn get_match(&self, user_id: Uuid, id: Uuid) -> Result<Match, AppError> {
        self.matches.find(user_id, id).await?.ok_or(AppError::NotFound("Match"))
    }

    pub async fn create_match(&self, user_id: Uuid, input: &CreateMatchPayload) -> Result<Match, AppError> {
        input.validate()?;
        self.matches.create(user_id, input).await
    }

    pub async fn update_match(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &UpdateMatchPayload,
    ) -> Result<Match, AppError> {
        input.validate()?;
        self.matches
            .update(user_id, id, input)
            .await?
            .ok_or(AppError::NotFound("Match"))
    }

    pub async fn delete_match(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.matches.delete(user_id, id).await? {
            return Err(AppError::NotFound("Match"));
        }
        Ok(())
    }

    pub async fn add_match_event(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        input: &CreateMatchEventPayload,
    ) -> Result<MatchEvent, AppError> {
        input.validate()?;
        self.get_match(user_id, match_id).await?;
        self.matches.add_event(match_id, input).await
    }

    pub async fn list_match_events(&self, user_id: Uuid, match_id: Uuid) -> Result<Vec<MatchEvent>, AppError> {
        self.get_match(user_id, match_id).await?;
        self.matches.list_events(match_id).await
    }

    pub async fn match_summary(&self, user_id: Uuid, match_id: Uuid) -> Result<MatchSummary, AppError> {
        let found = self.get_match(user_id, match_id).await?;
        let events = self.matches.list_events(match_id).await?;
        Ok(summarize_match(&found, &events))
    }

    pub async fn record_player_stats(
        &self,
        user_id: Uuid,
        match_id: Uuid,
        input: &RecordPlayerStatsPayload,
    ) -> Result<PlayerMatchStats, AppError> {
        input.validate()?;
        if input.passes_completed > input.passes_attempted {
            return Err(AppError::BadRequest(
                "Completed passes cannot exceed attempted passes.".to_string(),
            ));
        }
        self.get_match(user_id, match_id).await?;
        self.get_player(user_id, input.player_id).await?;
        self.players.upsert_match_stats(match_id, input).await
    }

    // =========================================================================
    //  DADOS DO CLUBE
    // =========================================================================

    pub async fn get_club_data(&self, user_id: Uuid) -> Result<ClubData, AppError> {
        Ok(self
            .clubs
            .find(user_id)
            .await?
            .unwrap_or_else(|| ClubData::placeholder(user_id)))
    }

    pub async fn save_club_data(&self, user_id: Uuid, input: &ClubDataInput) -> Result<ClubData, AppError> {
        input.validate()?;
        self.clubs.upsert(user_id, input).await
    }

    // =========================================================================
    //  EXPORTAÇÃO
    // =========================================================================

    pub async fn export_players(&self, user_id: Uuid, format: ExportFormat) -> Result<ExportFile, AppError> {
        let players = self.players.list(user_id, None).await?;
        let body = match format {
            ExportFormat::Csv => csv_codec::export_players(&players),
            ExportFormat::Json => to_pretty_json(&players)?,
        };

        self.finish_export(user_id, "players", format, body).await
    }

    /// Backup completo: `{ players, teams, matches, exportedAt }`.
    pub async fn export_backup(&self, user_id: Uuid) -> Result<ExportFile, AppError> {
        let players = self.players.list(user_id, None).await?;
        let teams = self.teams.list_by_owner(user_id).await?;
        let matches = self.matches.list(user_id, None).await?;

        let body = to_pretty_json(&json!({
            "players": players,
            "teams": teams,
            "matches": matches,
            "exportedAt": Utc::now(),
        }))?;

        self.finish_export(user_id, "backup", ExportFormat::Json, body).await
    }

    async fn finish_export(
        &self,
        user_id: Uuid,
        kind: &str,
        format: ExportFormat,
        body: String,
    ) -> Result<ExportFile, AppError> {
        let filename = export_filename(kind, format);
        self.exports
            .append(user_id, kind, format.extension(), &filename)
            .await?;
        tracing::info!(%user_id, %filename, "exportação gerada");
        Ok(ExportFile { filename, format, body })
    }

    pub async fn list_export_history(&self, user_id: Uuid) -> Result<Vec<ExportRecord>, AppError> {
        self.exports.list(user_id).await
    }

    pub async fn clear_export_history(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.exports.clear(user_id).await
    }

    // =========================================================================
    //  IMPORTAÇÃO
    // =========================================================================

    pub async fn import_csv(&self, user_id: Uuid, text: &str) -> Result<ImportSummary, AppError> {
        let parsed = csv_codec::parse_players(text).map_err(|e| match e {
            CsvError::Empty => AppError::BadRequest("CSV file is empty or invalid".to_string()),
        })?;

        let mut summary = ImportSummary { skipped: parsed.skipped, ..Default::default() };
        for input in &parsed.players {
            self.import_player(user_id, input, &mut summary).await;
        }

        tracing::info!(%user_id, ?summary, "importação CSV concluída");
        Ok(summary)
    }

    /// Aceita um array de jogadores ou um backup `{ players, teams, matches }`.
    pub async fn import_json(&self, user_id: Uuid, text: &str) -> Result<ImportSummary, AppError> {
        let document: ImportDocument = serde_json::from_str(text)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON import file: {e}")))?;

        let mut summary = ImportSummary::default();
        match document {
            ImportDocument::Players(players) => {
                for input in &players {
                    self.import_player(user_id, input, &mut summary).await;
                }
            }
            ImportDocument::Backup(backup) => self.import_backup(user_id, backup, &mut summary).await,
        }

        tracing::info!(%user_id, ?summary, "importação JSON concluída");
        Ok(summary)
    }

    async fn import_backup(&self, user_id: Uuid, backup: BackupDocument, summary: &mut ImportSummary) {
        // Times são casados pelo nome; o id antigo é remapeado para o atual.
        let existing = self.teams.list_by_owner(user_id).await.unwrap_or_default();
        let mut team_ids: HashMap<Uuid, Uuid> = HashMap::new();

        for team in backup.teams {
            let resolved = match existing.iter().find(|t| t.name == team.input.name) {
                Some(found) => Ok(found.id),
                None => self.create_team(user_id, &team.input).await.map(|t| t.id),
            };
            match resolved {
                Ok(id) => {
                    if let Some(old) = team.id {
                        team_ids.insert(old, id);
                    }
                    summary.imported += 1;
                }
                Err(e) => {
                    tracing::warn!(team = %team.input.name, error = ?e, "falha ao importar time");
                    summary.failed += 1;
                }
            }
        }

        for mut input in backup.players {
            input.team_id = input.team_id.and_then(|old| team_ids.get(&old).copied());
            self.import_player(user_id, &input, summary).await;
        }

        for record in backup.matches {
            let mut payload = record.payload;
            payload.team_id = payload.team_id.and_then(|old| team_ids.get(&old).copied());
            let existing_id = match record.id {
                Some(id) => self.matches.find(user_id, id).await.ok().flatten().map(|m| m.id),
                None => None,
            };
            let result = match existing_id {
                Some(id) => self.update_match(user_id, id, &UpdateMatchPayload::from(payload)).await,
                None => self.create_match(user_id, &payload).await,
            };
            match result {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    tracing::warn!(error = ?e, "falha ao importar partida");
                    summary.failed += 1;
                }
            }
        }
    }

    // Registro com id é atualização; sem id, cadastro. Falhas não abortam o lote.
    async fn import_player(&self, user_id: Uuid, input: &PlayerInput, summary: &mut ImportSummary) {
        let result = match input.id {
            Some(id) => self.update_player(user_id, id, input).await,
            None if input.name.as_deref().is_none_or(|n| n.trim().is_empty()) => {
                summary.skipped += 1;
                return;
            }
            None => self.create_player(user_id, input).await,
        };

        match result {
            Ok(_) => summary.imported += 1,
            Err(e) => {
                tracing::warn!(player = ?input.name, error = ?e, "falha ao importar jogador");
                summary.failed += 1;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Players(Vec<PlayerInput>),
    Backup(BackupDocument),
}

#[derive(Debug, Deserialize)]
struct BackupDocument {
    #[serde(default)]
    players: Vec<PlayerInput>,
    #[serde(default)]
    teams: Vec<TeamRecord>,
    #[serde(default)]
    matches: Vec<MatchRecord>,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    id: Option<Uuid>,
    #[serde(flatten)]
    input: TeamInput,
}

#[derive(Debug, Deserialize)]
struct MatchRecord {
    id: Option<Uuid>,
    #[serde(flatten)]
    payload: CreateMatchPayload,
}

impl From<CreateMatchPayload> for UpdateMatchPayload {
    fn from(p: CreateMatchPayload) -> Self {
        Self {
            team_id: p.team_id,
            match_date: Some(p.match_date),
            home_team: Some(p.home_team),
            away_team: Some(p.away_team),
            home_score: p.home_score,
            away_score: p.away_score,
            is_home: Some(p.is_home),
            venue: p.venue,
            competition: p.competition,
            status: Some(p.status),
            notes: p.notes,
        }
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::InternalServerError(e.into()))
}

/// `players_2026-10-18.csv`
pub fn export_filename(kind: &str, format: ExportFormat) -> String {
    format!("{}_{}.{}", kind, Utc::now().format("%Y-%m-%d"), format.extension())
}

/// Gols e cartões por tempo de jogo. Primeiro tempo: minuto ≤ 45.
pub fn summarize_match(found: &Match, events: &[MatchEvent]) -> MatchSummary {
    let ours = if found.is_home { TeamSide::Home } else { TeamSide::Away };
    let mut first_half = HalfStats::default();
    let mut second_half = HalfStats::default();

    for event in events {
        let half = if event.minute <= 45 { &mut first_half } else { &mut second_half };
        let is_ours = event.side == ours;
        match (event.kind, is_ours) {
            (MatchEventKind::Goal, true) => half.goals_for += 1,
            (MatchEventKind::Goal, false) => half.goals_against += 1,
            (MatchEventKind::YellowCard, true) => half.yellow_cards += 1,
            (MatchEventKind::YellowCard, false) => half.opponent_yellow_cards += 1,
            (MatchEventKind::RedCard, true) => half.red_cards += 1,
            (MatchEventKind::RedCard, false) => half.opponent_red_cards += 1,
        }
    }

    MatchSummary { match_id: found.id, first_half, second_half }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::MatchStatus;

    fn fixture(is_home: bool) -> Match {
        Match {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            team_id: None,
            match_date: Utc::now(),
            home_team: "Lions".into(),
            away_team: "Tigers".into(),
            home_score: Some(2),
            away_score: Some(1),
            is_home,
            venue: None,
            competition: None,
            status: MatchStatus::Completed,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn event(match_id: Uuid, minute: i32, kind: MatchEventKind, side: TeamSide) -> MatchEvent {
        MatchEvent {
            id: Uuid::new_v4(),
            match_id,
            minute,
            kind,
            side,
            player_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_splits_halves_at_minute_45() {
        let m = fixture(true);
        let events = vec![
            event(m.id, 12, MatchEventKind::Goal, TeamSide::Home),
            event(m.id, 45, MatchEventKind::YellowCard, TeamSide::Away),
            event(m.id, 46, MatchEventKind::Goal, TeamSide::Away),
            event(m.id, 80, MatchEventKind::Goal, TeamSide::Home),
            event(m.id, 90, MatchEventKind::RedCard, TeamSide::Home),
        ];

        let summary = summarize_match(&m, &events);
        assert_eq!(summary.first_half.goals_for, 1);
        assert_eq!(summary.first_half.opponent_yellow_cards, 1);
        assert_eq!(summary.second_half.goals_for, 1);
        assert_eq!(summary.second_half.goals_against, 1);
        assert_eq!(summary.second_half.red_cards, 1);
    }

    #[test]
    fn away_team_perspective_flips_sides() {
        let m = fixture(false);
        let events = vec![event(m.id, 30, MatchEventKind::Goal, TeamSide::Home)];
        let summary = summarize_match(&m, &events);
        assert_eq!(summary.first_half.goals_against, 1);
        assert_eq!(summary.first_half.goals_for, 0);
    }

    #[test]
    fn export_filename_uses_today() {
        let name = export_filename("players", ExportFormat::Csv);
        assert_eq!(name, format!("players_{}.csv", Utc::now().format("%Y-%m-%d")));
    }

    #[test]
    fn json_import_accepts_array_or_backup() {
        let array: ImportDocument = serde_json::from_str(r#"[{"name":"Ana","goals":3}]"#).unwrap();
        assert!(matches!(array, ImportDocument::Players(ref p) if p.len() == 1));

        let backup: ImportDocument = serde_json::from_str(
            r#"{"players":[{"name":"Ana"}],"teams":[{"id":"7d6f2c1e-3a43-4c8e-9d0b-0f3a5b2c1d4e","name":"Lions"}],"matches":[],"exportedAt":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        match backup {
            ImportDocument::Backup(b) => {
                assert_eq!(b.players.len(), 1);
                assert_eq!(b.teams[0].input.name, "Lions");
                assert_eq!(b.teams[0].input.sport, "soccer");
                assert!(b.teams[0].id.is_some());
            }
            other => panic!("expected backup, got {other:?}"),
        }
    }
}
