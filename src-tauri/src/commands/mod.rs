pub mod auth;
pub mod config;
pub mod health;
pub mod history;
pub mod prediction;
