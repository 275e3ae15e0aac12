//! Client for the optional remote prediction/history service.
//!
//! The service mirrors the local contract: it infers predictions for a
//! symptom list and keeps a per-user history. It is only used when an API
//! URL is configured and the last health check succeeded.

mod client;
pub mod types;

pub use client::RemoteClient;
