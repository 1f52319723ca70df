pub mod cache;
pub mod error;
pub mod fallback;
pub mod json;
