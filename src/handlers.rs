pub mod account;
pub mod ai_proxy;
pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod club;
pub mod data;
pub mod matches;
pub mod players;
pub mod teams;
