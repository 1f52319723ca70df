pub mod account;
pub mod analytics;
pub mod auth;
pub mod chat;
pub mod club;
pub mod export;
pub mod matches;
pub mod player;
pub mod team;
