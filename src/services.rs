pub mod account;
pub mod ai_backend;
pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod csv_codec;
pub mod data_management;
