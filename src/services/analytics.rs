// src/services/analytics.rs

use std::{
    collections::{BTreeMap, HashMap},
    future::Future,
    sync::Arc,
    time::Duration,
};

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{
    common::{
        cache::{Clock, TtlCache},
        error::AppError,
    },
    db::{MatchRepository, PlayerRepository, TeamRepository},
    models::{
        analytics::{MonthlyPerformance, PlayerPerformance, PositionStats, TeamStats},
        matches::Match,
        player::{Player, PlayerMatchStats},
    },
};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Agregados do time "principal" do usuário, com cache por usuário.
///
/// Nenhuma operação propaga erro: sem time ou com o banco fora do ar,
/// devolve a estrutura vazia e registra o motivo.
#[derive(Clone)]
pub struct AnalyticsService {
    teams: TeamRepository,
    matches: MatchRepository,
    players: PlayerRepository,
    team_stats_cache: TtlCache<Uuid, TeamStats>,
    player_cache: TtlCache<Uuid, Vec<PlayerPerformance>>,
    monthly_cache: TtlCache<Uuid, Vec<MonthlyPerformance>>,
    position_cache: TtlCache<Uuid, Vec<PositionStats>>,
}

impl AnalyticsService {
    pub fn new(
        teams: TeamRepository,
        matches: MatchRepository,
        players: PlayerRepository,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            teams,
            matches,
            players,
            team_stats_cache: TtlCache::new(ttl, clock.clone()),
            player_cache: TtlCache::new(ttl, clock.clone()),
            monthly_cache: TtlCache::new(ttl, clock.clone()),
            position_cache: TtlCache::new(ttl, clock),
        }
    }

    pub async fn team_stats(&self, user_id: Uuid) -> TeamStats {
        cached_or_fallback(&self.team_stats_cache, user_id, "team_stats", async {
            let Some(team_id) = self.primary_team(user_id).await? else {
                return Ok(None);
            };
            let matches = self.matches.completed_for_team(team_id, None).await?;
            let stats = self.team_match_stats(team_id).await?;
            Ok(Some(calculate_team_stats(&matches, &stats)))
        })
        .await
    }

    pub async fn player_performance(&self, user_id: Uuid) -> Vec<PlayerPerformance> {
        cached_or_fallback(&self.player_cache, user_id, "player_performance", async {
            let Some(team_id) = self.primary_team(user_id).await? else {
                return Ok(None);
            };
            let players = self.players.list_by_team(team_id).await?;
            let ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();
            let stats = self.players.stats_for_players(&ids).await?;
            Ok(Some(calculate_player_performance(&players, &stats)))
        })
        .await
    }

    pub async fn monthly_performance(&self, user_id: Uuid) -> Vec<MonthlyPerformance> {
        cached_or_fallback(&self.monthly_cache, user_id, "monthly_performance", async {
            let Some(team_id) = self.primary_team(user_id).await? else {
                return Ok(None);
            };
            let since = Utc::now() - chrono::Duration::days(365);
            let matches = self.matches.completed_for_team(team_id, Some(since)).await?;
            let stats = self.team_match_stats(team_id).await?;
            Ok(Some(group_matches_by_month(&matches, &stats)))
        })
        .await
    }

    pub async fn position_stats(&self, user_id: Uuid) -> Vec<PositionStats> {
        cached_or_fallback(&self.position_cache, user_id, "position_stats", async {
            let Some(team_id) = self.primary_team(user_id).await? else {
                return Ok(None);
            };
            let players = self.players.list_by_team(team_id).await?;
            let ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();
            let stats = self.players.stats_for_players(&ids).await?;
            Ok(Some(calculate_position_stats(&players, &stats)))
        })
        .await
    }

    pub fn clear_cache(&self, user_id: Uuid) {
        self.team_stats_cache.remove(&user_id);
        self.player_cache.remove(&user_id);
        self.monthly_cache.remove(&user_id);
        self.position_cache.remove(&user_id);
    }

    pub fn clear_all(&self) {
        self.team_stats_cache.clear();
        self.player_cache.clear();
        self.monthly_cache.clear();
        self.position_cache.clear();
    }

    async fn primary_team(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self.teams.find_primary(user_id).await?.map(|t| t.id))
    }

    async fn team_match_stats(&self, team_id: Uuid) -> Result<Vec<PlayerMatchStats>, AppError> {
        let players = self.players.list_by_team(team_id).await?;
        let ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();
        self.players.stats_for_players(&ids).await
    }
}

// Cache → cálculo → fallback. `Ok(None)` significa "usuário sem time".
async fn cached_or_fallback<T, F>(
    cache: &TtlCache<Uuid, T>,
    user_id: Uuid,
    what: &'static str,
    compute: F,
) -> T
where
    T: Clone + Default,
    F: Future<Output = Result<Option<T>, AppError>>,
{
    if let Some(hit) = cache.get(&user_id) {
        return hit;
    }

    match compute.await {
        Ok(Some(value)) => {
            cache.insert(user_id, value.clone());
            value
        }
        Ok(None) => {
            tracing::info!(%user_id, what, "usuário sem time, usando dados vazios");
            T::default()
        }
        Err(e) => {
            tracing::warn!(%user_id, what, error = ?e, "falha ao calcular analytics, usando dados vazios");
            T::default()
        }
    }
}

// =============================================================================
//  CÁLCULOS PUROS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchResult {
    Win,
    Draw,
    Loss,
}

// Placar na perspectiva do nosso time; placar ausente conta como 0.
fn team_score(m: &Match) -> (i64, i64) {
    let home = i64::from(m.home_score.unwrap_or(0));
    let away = i64::from(m.away_score.unwrap_or(0));
    if m.is_home { (home, away) } else { (away, home) }
}

fn outcome(ours: i64, theirs: i64) -> MatchResult {
    match ours.cmp(&theirs) {
        std::cmp::Ordering::Greater => MatchResult::Win,
        std::cmp::Ordering::Equal => MatchResult::Draw,
        std::cmp::Ordering::Less => MatchResult::Loss,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn assists_by_match(stats: &[PlayerMatchStats]) -> HashMap<Uuid, i64> {
    let mut totals = HashMap::new();
    for s in stats {
        *totals.entry(s.match_id).or_insert(0) += i64::from(s.assists);
    }
    totals
}

pub fn calculate_team_stats(matches: &[Match], stats: &[PlayerMatchStats]) -> TeamStats {
    let assists = assists_by_match(stats);
    let mut result = TeamStats { total_matches: matches.len() as u32, ..Default::default() };

    for m in matches {
        let (ours, theirs) = team_score(m);
        result.goals_for += ours;
        result.goals_against += theirs;
        result.total_assists += assists.get(&m.id).copied().unwrap_or(0);
        match outcome(ours, theirs) {
            MatchResult::Win => result.wins += 1,
            MatchResult::Draw => result.draws += 1,
            MatchResult::Loss => result.losses += 1,
        }
    }

    if result.total_matches > 0 {
        result.win_percentage =
            round1(f64::from(result.wins) / f64::from(result.total_matches) * 100.0);
    }
    result
}

struct PlayerTotals {
    matches: u32,
    goals: i64,
    assists: i64,
    minutes: i64,
    rating_sum: f64,
    passes_attempted: i64,
    passes_completed: i64,
}

impl PlayerTotals {
    fn of(player_id: Uuid, stats: &[PlayerMatchStats]) -> Self {
        let mut t = PlayerTotals {
            matches: 0,
            goals: 0,
            assists: 0,
            minutes: 0,
            rating_sum: 0.0,
            passes_attempted: 0,
            passes_completed: 0,
        };
        for s in stats.iter().filter(|s| s.player_id == player_id) {
            t.matches += 1;
            t.goals += i64::from(s.goals);
            t.assists += i64::from(s.assists);
            t.minutes += i64::from(s.minutes_played);
            t.rating_sum += s.rating;
            t.passes_attempted += i64::from(s.passes_attempted);
            t.passes_completed += i64::from(s.passes_completed);
        }
        t
    }

    fn average_rating(&self) -> f64 {
        if self.matches == 0 { 0.0 } else { self.rating_sum / f64::from(self.matches) }
    }
}

fn position_label(player: &Player) -> String {
    match player.position.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => "Unknown".to_string(),
    }
}

pub fn calculate_player_performance(
    players: &[Player],
    stats: &[PlayerMatchStats],
) -> Vec<PlayerPerformance> {
    players
        .iter()
        .map(|player| {
            let totals = PlayerTotals::of(player.id, stats);
            let avg = totals.average_rating();
            let pass_accuracy = if totals.passes_attempted > 0 {
                (totals.passes_completed as f64 / totals.passes_attempted as f64 * 100.0).round() as u32
            } else {
                0
            };

            PlayerPerformance {
                player_id: player.id,
                name: player.name.clone(),
                position: position_label(player),
                matches_played: totals.matches,
                goals: totals.goals,
                assists: totals.assists,
                average_rating: round1(avg),
                total_minutes: totals.minutes,
                pass_accuracy,
                form: (avg * 10.0).round().clamp(0.0, 100.0) as u32,
            }
        })
        .collect()
}

/// Agrupa por (ano, mês) e devolve em ordem cronológica, não na ordem
/// fixa Jan..Dez: a janela de 365 dias cruza a virada do ano, e o mesmo
/// mês de anos diferentes fica em baldes separados.
pub fn group_matches_by_month(matches: &[Match], stats: &[PlayerMatchStats]) -> Vec<MonthlyPerformance> {
    let assists = assists_by_match(stats);
    let mut buckets: BTreeMap<(i32, u32), MonthlyPerformance> = BTreeMap::new();

    for m in matches {
        let (year, month) = (m.match_date.year(), m.match_date.month());
        let bucket = buckets.entry((year, month)).or_insert_with(|| MonthlyPerformance {
            month: MONTH_NAMES[(month - 1) as usize].to_string(),
            year,
            wins: 0,
            draws: 0,
            losses: 0,
            goals: 0,
            assists: 0,
            matches_played: 0,
        });

        let (ours, theirs) = team_score(m);
        bucket.matches_played += 1;
        bucket.goals += ours;
        bucket.assists += assists.get(&m.id).copied().unwrap_or(0);
        match outcome(ours, theirs) {
            MatchResult::Win => bucket.wins += 1,
            MatchResult::Draw => bucket.draws += 1,
            MatchResult::Loss => bucket.losses += 1,
        }
    }

    buckets.into_values().collect()
}

/// Ordem das posições: primeira aparição no elenco.
pub fn calculate_position_stats(players: &[Player], stats: &[PlayerMatchStats]) -> Vec<PositionStats> {
    let mut groups: Vec<(PositionStats, f64)> = Vec::new();

    for player in players {
        let label = position_label(player);
        let totals = PlayerTotals::of(player.id, stats);
        let index = match groups.iter().position(|(g, _)| g.position == label) {
            Some(i) => i,
            None => {
                groups.push((
                    PositionStats {
                        position: label,
                        player_count: 0,
                        total_goals: 0,
                        total_assists: 0,
                        average_rating: 0.0,
                    },
                    0.0,
                ));
                groups.len() - 1
            }
        };

        let (group, rating_sum) = &mut groups[index];
        group.player_count += 1;
        group.total_goals += totals.goals;
        group.total_assists += totals.assists;
        *rating_sum += totals.average_rating();
    }

    groups
        .into_iter()
        .map(|(mut group, rating_sum)| {
            group.average_rating = round1(rating_sum / f64::from(group.player_count));
            group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::cache::ManualClock,
        models::{matches::MatchStatus, player::SkillRatings},
    };
    use chrono::{DateTime, TimeZone};

    fn game(home: i32, away: i32, is_home: bool, date: DateTime<Utc>) -> Match {
        Match {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            team_id: None,
            match_date: date,
            home_team: "A".into(),
            away_team: "B".into(),
            home_score: Some(home),
            away_score: Some(away),
            is_home,
            venue: None,
            competition: None,
            status: MatchStatus::Completed,
            notes: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn player(name: &str, position: Option<&str>) -> Player {
        Player {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            team_id: None,
            name: name.into(),
            jersey_number: None,
            position: position.map(Into::into),
            age: None,
            nationality: None,
            birth_date: None,
            goals: 0,
            assists: 0,
            minutes: 0,
            yellow_cards: 0,
            red_cards: 0,
            shots: 0,
            passes: 0,
            duels_won: 0,
            skills: SkillRatings::default(),
            fitness: 100,
            medical_clearance: true,
            injuries: Vec::new(),
            notes: None,
            photo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(player_id: Uuid, goals: i32, assists: i32, rating: f64, attempted: i32, completed: i32) -> PlayerMatchStats {
        PlayerMatchStats {
            id: Uuid::new_v4(),
            player_id,
            match_id: Uuid::new_v4(),
            goals,
            assists,
            minutes_played: 90,
            rating,
            passes_attempted: attempted,
            passes_completed: completed,
        }
    }

    fn on(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, 10, 18, 0, 0).unwrap()
    }

    #[test]
    fn team_stats_example_scenario() {
        let matches = vec![
            game(2, 1, true, on(1)),
            game(0, 3, true, on(2)),
            game(1, 1, false, on(3)),
        ];
        let stats = calculate_team_stats(&matches, &[]);
        assert_eq!(stats.total_matches, 3);
        assert_eq!((stats.wins, stats.draws, stats.losses), (1, 1, 1));
        assert_eq!(stats.goals_for, 3);
        assert_eq!(stats.goals_against, 5);
        assert_eq!(stats.win_percentage, 33.3);
    }

    #[test]
    fn away_matches_use_away_score() {
        let stats = calculate_team_stats(&[game(0, 2, false, on(4))], &[]);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.goals_for, 2);
        assert_eq!(stats.win_percentage, 100.0);
    }

    #[test]
    fn no_matches_means_zero_percentage() {
        assert_eq!(calculate_team_stats(&[], &[]), TeamStats::default());
    }

    #[test]
    fn team_assists_come_from_match_lines() {
        let m = game(3, 0, true, on(5));
        let mut a = line(Uuid::new_v4(), 1, 2, 7.0, 0, 0);
        a.match_id = m.id;
        let mut b = line(Uuid::new_v4(), 0, 1, 7.0, 0, 0);
        b.match_id = m.id;
        let unrelated = line(Uuid::new_v4(), 0, 5, 7.0, 0, 0);
        assert_eq!(calculate_team_stats(&[m], &[a, b, unrelated]).total_assists, 3);
    }

    #[test]
    fn player_performance_rounds_and_clamps() {
        let p = player("Ana", Some("Midfielder"));
        let stats = vec![line(p.id, 1, 0, 7.25, 40, 33), line(p.id, 0, 2, 8.0, 60, 50)];
        let perf = calculate_player_performance(std::slice::from_ref(&p), &stats);

        assert_eq!(perf[0].matches_played, 2);
        assert_eq!(perf[0].goals, 1);
        assert_eq!(perf[0].assists, 2);
        assert_eq!(perf[0].total_minutes, 180);
        assert_eq!(perf[0].average_rating, 7.6);
        assert_eq!(perf[0].pass_accuracy, 83);
        assert_eq!(perf[0].form, 76);
    }

    #[test]
    fn player_without_lines_has_zeroes() {
        let perf = calculate_player_performance(&[player("Bia", None)], &[]);
        assert_eq!(perf[0].position, "Unknown");
        assert_eq!(perf[0].average_rating, 0.0);
        assert_eq!(perf[0].pass_accuracy, 0);
        assert_eq!(perf[0].form, 0);
    }

    #[test]
    fn monthly_buckets_are_chronological_and_order_independent() {
        let dec_prev = Utc.with_ymd_and_hms(2025, 12, 5, 0, 0, 0).unwrap();
        let forward = vec![
            game(1, 0, true, dec_prev),
            game(2, 2, true, on(1)),
            game(0, 1, true, on(1)),
            game(3, 1, false, on(2)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = group_matches_by_month(&forward, &[]);
        let b = group_matches_by_month(&reversed, &[]);
        assert_eq!(a, b);

        let labels: Vec<(String, i32)> = a.iter().map(|m| (m.month.clone(), m.year)).collect();
        assert_eq!(
            labels,
            vec![("Dec".into(), 2025), ("Jan".into(), 2026), ("Feb".into(), 2026)]
        );
        assert_eq!(a[1].matches_played, 2);
        assert_eq!((a[1].wins, a[1].draws, a[1].losses), (0, 1, 1));
        assert_eq!(a[1].goals, 2);
        assert_eq!(a[2].goals, 1);
        assert_eq!(a[2].losses, 1);
    }

    #[test]
    fn same_month_different_years_stay_apart() {
        let a = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let months = group_matches_by_month(&[game(1, 0, true, b), game(1, 0, true, a)], &[]);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].year, 2025);
    }

    #[test]
    fn positions_group_in_first_seen_order() {
        let ana = player("Ana", Some("Forward"));
        let bia = player("Bia", Some(" "));
        let cris = player("Cris", Some("Forward"));
        let stats = vec![
            line(ana.id, 2, 1, 8.0, 0, 0),
            line(cris.id, 1, 0, 6.0, 0, 0),
            line(cris.id, 0, 0, 7.0, 0, 0),
        ];

        let groups = calculate_position_stats(&[ana, bia, cris], &stats);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].position, "Forward");
        assert_eq!(groups[0].player_count, 2);
        assert_eq!(groups[0].total_goals, 3);
        assert_eq!(groups[0].total_assists, 1);
        // média das médias: (8.0 + 6.5) / 2
        assert_eq!(groups[0].average_rating, 7.3);
        assert_eq!(groups[1].position, "Unknown");
        assert_eq!(groups[1].average_rating, 0.0);
    }

    #[tokio::test]
    async fn fallback_result_is_not_cached() {
        let clock = ManualClock::new();
        let cache: TtlCache<Uuid, TeamStats> =
            TtlCache::new(Duration::from_secs(300), Arc::new(clock.clone()));
        let user = Uuid::new_v4();

        let down = cached_or_fallback(&cache, user, "team_stats", async {
            Err(AppError::BadRequest("store offline".into()))
        })
        .await;
        assert_eq!(down, TeamStats::default());
        assert!(cache.is_empty());

        let computed = TeamStats { total_matches: 4, ..Default::default() };
        let expected = computed.clone();
        let up = cached_or_fallback(&cache, user, "team_stats", async move { Ok(Some(computed)) }).await;
        assert_eq!(up, expected);
        assert_eq!(cache.get(&user), Some(expected));
    }
}
