pub mod user_repo;
pub use user_repo::UserRepository;
pub mod account_repo;
pub use account_repo::AccountRepository;
pub mod team_repo;
pub use team_repo::TeamRepository;
pub mod player_repo;
pub use player_repo::PlayerRepository;
pub mod club_repo;
pub use club_repo::ClubRepository;
pub mod match_repo;
pub use match_repo::MatchRepository;
pub mod export_repo;
pub use export_repo::ExportRepository;
