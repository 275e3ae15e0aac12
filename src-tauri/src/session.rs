//! Session result model: the state of one symptom-check interaction.
//!
//! A session moves `Selecting -> Analyzing -> ShowingResults` and back to
//! `Selecting` on reset. The `Analyzing` phase is the only mutual-exclusion
//! device in the pipeline: while it is active no second analysis can start.
//! Every entry into `Analyzing` bumps a generation counter, and results are
//! only accepted for the current generation.

use serde::Serialize;

use crate::catalog::SymptomCatalog;
use crate::error::MediPredictError;
use crate::inference::Prediction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Selecting,
    Analyzing,
    ShowingResults,
}

/// Proof that an analysis was started, handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
    selection: Vec<String>,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selection snapshot taken when the analysis began.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }
}

/// Serializable view of the session for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub selected: Vec<String>,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub struct PredictionSession {
    catalog: SymptomCatalog,
    /// Insertion-ordered, duplicate-free
    selected: Vec<String>,
    predictions: Vec<Prediction>,
    phase: Phase,
    generation: u64,
}

impl PredictionSession {
    pub fn new(catalog: SymptomCatalog) -> Self {
        Self {
            catalog,
            selected: Vec::new(),
            predictions: Vec::new(),
            phase: Phase::Selecting,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            selected: self.selected.clone(),
            predictions: self.predictions.clone(),
        }
    }

    /// Select or deselect one symptom. Idempotent in both directions.
    pub fn toggle(&mut self, symptom_id: &str, selected: bool) -> Result<(), MediPredictError> {
        if self.phase != Phase::Selecting {
            return Err(MediPredictError::Validation(
                "Symptoms can only be changed while selecting".to_string(),
            ));
        }
        if !self.catalog.contains(symptom_id) {
            return Err(MediPredictError::Validation(format!(
                "Unknown symptom: {}",
                symptom_id
            )));
        }

        let present = self.selected.iter().any(|s| s == symptom_id);
        match (selected, present) {
            (true, false) => self.selected.push(symptom_id.to_string()),
            (false, true) => self.selected.retain(|s| s != symptom_id),
            _ => {}
        }
        Ok(())
    }

    /// `Selecting -> Analyzing`. Fails on an empty selection or while
    /// another analysis is outstanding.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, MediPredictError> {
        match self.phase {
            Phase::Analyzing => return Err(MediPredictError::Busy),
            Phase::ShowingResults => {
                return Err(MediPredictError::Validation(
                    "Start a new prediction before analyzing again".to_string(),
                ))
            }
            Phase::Selecting => {}
        }
        if self.selected.is_empty() {
            return Err(MediPredictError::Validation(
                "Please select at least one symptom".to_string(),
            ));
        }

        self.generation += 1;
        self.phase = Phase::Analyzing;
        Ok(AnalysisTicket {
            generation: self.generation,
            selection: self.selected.clone(),
        })
    }

    /// `Analyzing -> ShowingResults`.
    pub fn complete(
        &mut self,
        ticket: &AnalysisTicket,
        predictions: Vec<Prediction>,
    ) -> Result<(), MediPredictError> {
        self.check_current(ticket)?;
        if predictions.is_empty() {
            return Err(MediPredictError::Validation(
                "Analysis produced no predictions".to_string(),
            ));
        }
        self.predictions = predictions;
        self.phase = Phase::ShowingResults;
        Ok(())
    }

    /// `Analyzing -> Selecting`, keeping the selection so the user can retry.
    pub fn abort(&mut self, ticket: &AnalysisTicket) -> Result<(), MediPredictError> {
        self.check_current(ticket)?;
        self.phase = Phase::Selecting;
        Ok(())
    }

    /// Clear everything and return to `Selecting`. Any analysis still in
    /// flight becomes stale.
    pub fn reset(&mut self) {
        if self.phase == Phase::Analyzing {
            self.generation += 1;
        }
        self.selected.clear();
        self.predictions.clear();
        self.phase = Phase::Selecting;
    }

    fn check_current(&self, ticket: &AnalysisTicket) -> Result<(), MediPredictError> {
        if self.phase != Phase::Analyzing || ticket.generation != self.generation {
            return Err(MediPredictError::Stale(ticket.generation));
        }
        Ok(())
    }
}

impl Default for PredictionSession {
    fn default() -> Self {
        Self::new(SymptomCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::RuleEngine;

    fn session_with(ids: &[&str]) -> PredictionSession {
        let mut session = PredictionSession::default();
        for id in ids {
            session.toggle(id, true).unwrap();
        }
        session
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut session = PredictionSession::default();
        session.toggle("fever", true).unwrap();
        session.toggle("fever", true).unwrap();
        assert_eq!(session.selected(), &["fever".to_string()]);

        session.toggle("cough", false).unwrap();
        session.toggle("fever", false).unwrap();
        session.toggle("fever", false).unwrap();
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let session = session_with(&["rash", "fever", "cough"]);
        assert_eq!(session.selected(), &["rash", "fever", "cough"]);
    }

    #[test]
    fn test_toggle_unknown_symptom_rejected() {
        let mut session = PredictionSession::default();
        let err = session.toggle("hiccups", true).unwrap_err();
        assert!(err.is_validation());
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_empty_selection_cannot_analyze() {
        let mut session = PredictionSession::default();
        let err = session.begin_analysis().unwrap_err();
        assert!(matches!(err, MediPredictError::Validation(_)));
        assert_eq!(session.phase(), Phase::Selecting);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_full_cycle() {
        let mut session = session_with(&["headache", "fatigue"]);
        let ticket = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), Phase::Analyzing);
        assert_eq!(ticket.selection(), &["headache", "fatigue"]);

        let predictions = RuleEngine::default().infer(ticket.selection());
        session.complete(&ticket, predictions).unwrap();
        assert_eq!(session.phase(), Phase::ShowingResults);
        assert_eq!(session.predictions()[0].condition, "Migraine");

        session.reset();
        assert_eq!(session.phase(), Phase::Selecting);
        assert!(session.selected().is_empty());
        assert!(session.predictions().is_empty());
    }

    #[test]
    fn test_second_analysis_while_analyzing_is_busy() {
        let mut session = session_with(&["rash"]);
        let _ticket = session.begin_analysis().unwrap();
        assert!(matches!(
            session.begin_analysis(),
            Err(MediPredictError::Busy)
        ));
    }

    #[test]
    fn test_toggle_while_analyzing_rejected() {
        let mut session = session_with(&["rash"]);
        session.begin_analysis().unwrap();
        assert!(session.toggle("fever", true).is_err());
        assert_eq!(session.selected(), &["rash"]);
    }

    #[test]
    fn test_complete_with_empty_predictions_rejected() {
        let mut session = session_with(&["rash"]);
        let ticket = session.begin_analysis().unwrap();
        assert!(session.complete(&ticket, Vec::new()).is_err());
        assert_eq!(session.phase(), Phase::Analyzing);
    }

    #[test]
    fn test_reset_during_analysis_makes_result_stale() {
        let mut session = session_with(&["rash"]);
        let ticket = session.begin_analysis().unwrap();
        session.reset();

        let predictions = RuleEngine::default().infer(ticket.selection());
        let err = session.complete(&ticket, predictions).unwrap_err();
        assert!(matches!(err, MediPredictError::Stale(1)));
        assert_eq!(session.phase(), Phase::Selecting);
        assert!(session.predictions().is_empty());
    }

    #[test]
    fn test_abort_returns_to_selecting_with_selection() {
        let mut session = session_with(&["rash", "fever"]);
        let ticket = session.begin_analysis().unwrap();
        session.abort(&ticket).unwrap();
        assert_eq!(session.phase(), Phase::Selecting);
        assert_eq!(session.selected().len(), 2);
    }

    #[test]
    fn test_snapshot_serializes_phase_snake_case() {
        let session = session_with(&["rash"]);
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains(r#""phase":"selecting""#), "got {}", json);
    }
}
