//! Symptom-to-condition inference engine.
//!
//! This module provides a TOML-driven rule engine that translates a symptom
//! selection into an ordered list of condition predictions.
//!
//! # Architecture
//!
//! - **Rules**: An ordered table of `(predicate, prediction)` rows, loaded
//!   from embedded TOML or a custom file
//! - **Evaluation**: Every matching rule contributes one prediction, in
//!   table order; `exclusive_group` turns a run of rules into an
//!   if / else-if chain
//! - **Fallback**: A non-empty selection that matches nothing yields the
//!   fallback prediction, so results are never empty
//!
//! # Example
//!
//! ```ignore
//! use medipredict_tauri::inference::{default_rules, RuleEngine};
//!
//! let engine = RuleEngine::new(default_rules());
//! let predictions = engine.infer(&["fever", "cough", "difficulty_breathing"]);
//! assert_eq!(predictions[0].condition, "COVID-19");
//! ```

mod engine;
mod rules;
mod types;

pub use engine::RuleEngine;
pub use rules::{default_rules, load_rules, parse_rules};
pub use types::*;
