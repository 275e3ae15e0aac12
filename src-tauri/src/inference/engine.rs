//! Rule evaluation engine for symptom-to-condition inference.
//!
//! The `RuleEngine` walks the ordered rule table once per call and collects
//! one prediction per matching rule.

use std::collections::HashSet;

use super::types::*;

const UNKNOWN_DESCRIPTION: &str = "A medical condition requiring attention.";
const UNKNOWN_RECOMMENDATION: &str =
    "Consult with a healthcare professional for proper diagnosis and treatment.";

/// The rule evaluation engine.
///
/// Deterministic and side-effect free: the same selection always yields the
/// same predictions in the same order.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: RulesConfig,
}

impl RuleEngine {
    /// Create a new rule engine with the given configuration.
    ///
    /// # Arguments
    /// * `rules` - Rule configuration (typically from `default_rules()` or `load_rules()`)
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules }
    }

    /// Map a symptom selection to an ordered list of predictions.
    ///
    /// An empty selection yields an empty list. Any non-empty selection
    /// yields at least one prediction: the fallback is used when no rule
    /// matches. Duplicate ids in `selected` are ignored.
    pub fn infer<S: AsRef<str>>(&self, selected: &[S]) -> Vec<Prediction> {
        if selected.is_empty() {
            return Vec::new();
        }

        let selected: HashSet<&str> = selected.iter().map(|s| s.as_ref()).collect();
        let mut fired_groups: HashSet<&str> = HashSet::new();
        let mut predictions = Vec::new();

        for rule in &self.rules.rules {
            let group = rule.exclusive_group.as_deref();
            if group.is_some_and(|g| fired_groups.contains(g)) {
                continue;
            }
            if !rule.matches(&selected) {
                continue;
            }
            if let Some(g) = group {
                fired_groups.insert(g);
            }
            predictions.push(self.prediction_for(&rule.condition, rule.probability));
        }

        if predictions.is_empty() {
            let fallback = &self.rules.fallback;
            predictions.push(self.prediction_for(&fallback.condition, fallback.probability));
        }

        predictions
    }

    /// Build a prediction with texts from the condition table.
    pub fn prediction_for(&self, condition: &str, probability: u8) -> Prediction {
        let (description, recommendation) = match self.rules.conditions.get(condition) {
            Some(info) => (info.description.clone(), info.recommendation.clone()),
            None => (
                UNKNOWN_DESCRIPTION.to_string(),
                UNKNOWN_RECOMMENDATION.to_string(),
            ),
        };

        Prediction {
            condition: condition.to_string(),
            probability: probability.min(MAX_PROBABILITY),
            description,
            recommendation,
        }
    }

    /// Number of rules in the table (excluding the fallback).
    pub fn rule_count(&self) -> usize {
        self.rules.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(super::default_rules())
    }
}
