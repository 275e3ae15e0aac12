//! TOML rule loading for the inference engine.
//!
//! Provides two loading methods:
//! - `default_rules()` - Loads embedded rules compiled into the binary
//! - `load_rules(path)` - Loads custom rules from a file path

use anyhow::Result;
use std::path::Path;

use crate::catalog::SymptomCatalog;

use super::types::RulesConfig;

/// Default rules embedded in the binary at compile time.
/// These are loaded from `src-tauri/config/prediction_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/prediction_rules.toml");

/// Load and validate rules from a TOML file at the given path.
///
/// # Returns
/// * `Ok(RulesConfig)` - Parsed rules configuration
/// * `Err` - If the file cannot be read, the TOML is invalid, or the table
///   references unknown conditions or symptoms
pub fn load_rules(path: &Path) -> Result<RulesConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Parse and validate a rule table from TOML text.
pub fn parse_rules(content: &str) -> Result<RulesConfig> {
    let config: RulesConfig = toml::from_str(content)?;
    config.validate(&SymptomCatalog::builtin())?;
    Ok(config)
}

/// Get the default rules embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rules() -> RulesConfig {
    toml::from_str(DEFAULT_RULES).expect("embedded prediction_rules.toml must be valid TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_loads_and_validates() {
        let rules = default_rules();
        assert_eq!(rules.rules.len(), 4);
        rules
            .validate(&SymptomCatalog::builtin())
            .expect("embedded rules should validate");
    }

    #[test]
    fn test_default_rule_order() {
        let rules = default_rules();
        let order: Vec<&str> = rules.rules.iter().map(|r| r.condition.as_str()).collect();
        assert_eq!(order, vec!["COVID-19", "Common Cold", "Migraine", "Food Poisoning"]);
    }

    #[test]
    fn test_fever_rules_share_group() {
        let rules = default_rules();
        let fever_group: Vec<_> = rules
            .rules
            .iter()
            .filter(|r| r.exclusive_group.as_deref() == Some("fever"))
            .collect();
        assert_eq!(fever_group.len(), 2);
    }

    #[test]
    fn test_fallback_is_general_malaise() {
        let rules = default_rules();
        assert_eq!(rules.fallback.condition, "General Malaise");
        assert_eq!(rules.fallback.probability, 50);
    }

    #[test]
    fn test_unknown_condition_rejected() {
        let toml = r#"
            [fallback]
            condition = "General Malaise"
            probability = 50

            [[rules]]
            condition = "Dragon Pox"
            probability = 90
            all_of = ["rash"]

            [conditions."General Malaise"]
            description = "d"
            recommendation = "r"
        "#;
        let err = parse_rules(toml).unwrap_err();
        assert!(err.to_string().contains("Dragon Pox"), "got: {}", err);
    }

    #[test]
    fn test_probability_above_hundred_rejected() {
        let toml = r#"
            [fallback]
            condition = "General Malaise"
            probability = 50

            [[rules]]
            condition = "General Malaise"
            probability = 150
            all_of = ["rash"]

            [conditions."General Malaise"]
            description = "d"
            recommendation = "r"
        "#;
        assert!(parse_rules(toml).is_err());
    }

    #[test]
    fn test_unknown_symptom_rejected() {
        let toml = r#"
            [fallback]
            condition = "General Malaise"
            probability = 50

            [[rules]]
            condition = "General Malaise"
            probability = 10
            all_of = ["hiccups"]

            [conditions."General Malaise"]
            description = "d"
            recommendation = "r"
        "#;
        let err = parse_rules(toml).unwrap_err();
        assert!(err.to_string().contains("hiccups"));
    }

    #[test]
    fn test_load_rules_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, DEFAULT_RULES).unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.conditions.len(), 6);
    }

    #[test]
    fn test_load_rules_missing_file() {
        assert!(load_rules(Path::new("/nonexistent/rules.toml")).is_err());
    }
}
