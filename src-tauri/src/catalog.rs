//! Static symptom catalog.
//!
//! The catalog is the single source of valid symptom identifiers and their
//! display labels. It is built once at startup and never mutated.

use serde::Serialize;

/// A selectable symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symptom {
    /// Stable identifier sent to the engine and the remote service
    pub id: &'static str,
    /// Human-readable label stored in history entries
    pub label: &'static str,
}

const BUILTIN_SYMPTOMS: &[Symptom] = &[
    Symptom { id: "fever", label: "Fever" },
    Symptom { id: "cough", label: "Cough" },
    Symptom { id: "fatigue", label: "Fatigue" },
    Symptom { id: "difficulty_breathing", label: "Difficulty Breathing" },
    Symptom { id: "headache", label: "Headache" },
    Symptom { id: "sore_throat", label: "Sore Throat" },
    Symptom { id: "body_aches", label: "Body Aches" },
    Symptom { id: "loss_of_taste_or_smell", label: "Loss of Taste or Smell" },
    Symptom { id: "nausea", label: "Nausea" },
    Symptom { id: "diarrhea", label: "Diarrhea" },
    Symptom { id: "congestion", label: "Congestion" },
    Symptom { id: "chest_pain", label: "Chest Pain" },
    Symptom { id: "dizziness", label: "Dizziness" },
    Symptom { id: "abdominal_pain", label: "Abdominal Pain" },
    Symptom { id: "rash", label: "Rash" },
];

/// Ordered collection of known symptoms.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    symptoms: &'static [Symptom],
}

impl SymptomCatalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self {
            symptoms: BUILTIN_SYMPTOMS,
        }
    }

    /// All symptoms in display order.
    pub fn all(&self) -> &[Symptom] {
        self.symptoms
    }

    pub fn get(&self, id: &str) -> Option<&Symptom> {
        self.symptoms.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn label_of(&self, id: &str) -> Option<&'static str> {
        self.get(id).map(|s| s.label)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_has_fifteen_symptoms() {
        let catalog = SymptomCatalog::builtin();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.all()[0].id, "fever");
        assert_eq!(catalog.all()[14].id, "rash");
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = SymptomCatalog::builtin();
        let ids: HashSet<_> = catalog.all().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), catalog.len(), "Symptom ids must be unique");
    }

    #[test]
    fn test_label_lookup() {
        let catalog = SymptomCatalog::builtin();
        assert_eq!(catalog.label_of("difficulty_breathing"), Some("Difficulty Breathing"));
        assert_eq!(catalog.label_of("loss_of_taste_or_smell"), Some("Loss of Taste or Smell"));
        assert_eq!(catalog.label_of("hiccups"), None);
        assert!(!catalog.contains(""));
    }
}
