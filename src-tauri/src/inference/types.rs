//! Type definitions for the symptom inference engine.
//!
//! Configuration types are deserialized from TOML; `Prediction` is the
//! output type shared with the history store, the remote client and the
//! frontend.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::SymptomCatalog;
use crate::error::MediPredictError;

/// Highest probability a prediction may carry.
pub const MAX_PROBABILITY: u8 = 100;

// =============================================================================
// CONFIGURATION TYPES (loaded from TOML)
// =============================================================================

/// Root configuration loaded from prediction_rules.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Condition texts keyed by condition name (e.g., "COVID-19")
    pub conditions: HashMap<String, ConditionInfo>,
    /// Ordered rule table; order decides output order
    pub rules: Vec<PredictionRule>,
    /// Prediction emitted when no rule matches
    pub fallback: FallbackRule,
}

/// User-facing texts for a condition.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionInfo {
    pub description: String,
    pub recommendation: String,
}

/// One row of the rule table: a predicate over the selection plus the
/// prediction it produces.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRule {
    /// Condition name (must match a key in `conditions`)
    pub condition: String,
    /// Static probability reported when the rule fires
    pub probability: u8,
    /// Every symptom listed here must be selected
    pub all_of: Vec<String>,
    /// None of the symptoms listed here may be selected
    #[serde(default)]
    pub none_of: Vec<String>,
    /// Only the first matching rule of a group fires
    #[serde(default)]
    pub exclusive_group: Option<String>,
}

impl PredictionRule {
    /// Whether the predicate holds for the given selection.
    pub fn matches(&self, selected: &HashSet<&str>) -> bool {
        self.all_of.iter().all(|s| selected.contains(s.as_str()))
            && !self.none_of.iter().any(|s| selected.contains(s.as_str()))
    }
}

/// The catch-all prediction used when nothing matched.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackRule {
    pub condition: String,
    pub probability: u8,
}

impl RulesConfig {
    /// Check the table for mistakes that would otherwise surface as silently
    /// wrong predictions.
    pub fn validate(&self, catalog: &SymptomCatalog) -> Result<(), MediPredictError> {
        if !self.conditions.contains_key(&self.fallback.condition) {
            return Err(MediPredictError::Rules(format!(
                "Fallback condition '{}' has no description",
                self.fallback.condition
            )));
        }
        if self.fallback.probability > MAX_PROBABILITY {
            return Err(MediPredictError::Rules(format!(
                "Fallback probability {} exceeds {}",
                self.fallback.probability, MAX_PROBABILITY
            )));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if !self.conditions.contains_key(&rule.condition) {
                return Err(MediPredictError::Rules(format!(
                    "Rule {} references unknown condition '{}'",
                    index, rule.condition
                )));
            }
            if rule.probability > MAX_PROBABILITY {
                return Err(MediPredictError::Rules(format!(
                    "Rule {} ({}) has probability {} above {}",
                    index, rule.condition, rule.probability, MAX_PROBABILITY
                )));
            }
            if rule.all_of.is_empty() {
                return Err(MediPredictError::Rules(format!(
                    "Rule {} ({}) must require at least one symptom",
                    index, rule.condition
                )));
            }
            if let Some(unknown) = rule
                .all_of
                .iter()
                .chain(rule.none_of.iter())
                .find(|s| !catalog.contains(s))
            {
                return Err(MediPredictError::Rules(format!(
                    "Rule {} ({}) references unknown symptom '{}'",
                    index, rule.condition, unknown
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// OUTPUT TYPES (serialized to frontend and storage)
// =============================================================================

/// A single condition prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub condition: String,
    /// Match strength in percent, 0..=100
    pub probability: u8,
    pub description: String,
    pub recommendation: String,
}

impl Prediction {
    /// Structural check used for data that did not come from the local engine.
    pub fn is_valid(&self) -> bool {
        self.probability <= MAX_PROBABILITY && !self.condition.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(all_of: &[&str], none_of: &[&str]) -> PredictionRule {
        PredictionRule {
            condition: "Migraine".to_string(),
            probability: 65,
            all_of: all_of.iter().map(|s| s.to_string()).collect(),
            none_of: none_of.iter().map(|s| s.to_string()).collect(),
            exclusive_group: None,
        }
    }

    #[test]
    fn test_rule_matches_requires_all() {
        let r = rule(&["headache", "fatigue"], &[]);
        assert!(r.matches(&HashSet::from(["headache", "fatigue", "rash"])));
        assert!(!r.matches(&HashSet::from(["headache"])));
    }

    #[test]
    fn test_rule_none_of_blocks_match() {
        let r = rule(&["headache"], &["fever"]);
        assert!(r.matches(&HashSet::from(["headache"])));
        assert!(!r.matches(&HashSet::from(["headache", "fever"])));
    }

    #[test]
    fn test_prediction_deserialize() {
        let json = r#"{
            "condition": "Flu",
            "probability": 40,
            "description": "d",
            "recommendation": "r"
        }"#;
        let p: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.condition, "Flu");
        assert_eq!(p.probability, 40);
        assert!(p.is_valid());
    }

    #[test]
    fn test_prediction_out_of_range_is_invalid() {
        let p = Prediction {
            condition: "Flu".to_string(),
            probability: 120,
            description: String::new(),
            recommendation: String::new(),
        };
        assert!(!p.is_valid());
    }

    #[test]
    fn test_negative_probability_fails_to_parse() {
        let json = r#"{"condition":"Flu","probability":-3,"description":"","recommendation":""}"#;
        assert!(serde_json::from_str::<Prediction>(json).is_err());
    }
}
