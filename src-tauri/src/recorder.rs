//! Turns a finished analysis into a history entry.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::catalog::SymptomCatalog;
use crate::error::MediPredictError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::inference::Prediction;
use crate::storage::Storage;

/// The only component that mints new `HistoryEntry` values.
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    catalog: SymptomCatalog,
}

impl SessionRecorder {
    pub fn new(catalog: SymptomCatalog) -> Self {
        Self { catalog }
    }

    /// Record a completed analysis stamped with the current time.
    pub fn record<S: Storage>(
        &self,
        store: &mut HistoryStore<S>,
        selection: &[String],
        predictions: &[Prediction],
    ) -> Result<HistoryEntry, MediPredictError> {
        self.record_at(store, selection, predictions, Utc::now())
    }

    /// Record a completed analysis at an explicit time.
    ///
    /// Ids that are no longer in the catalog are dropped from the label list.
    /// The entry id is `now` in epoch milliseconds, pushed past the newest id
    /// already in the store so two recordings in the same millisecond stay
    /// distinct and ordered.
    pub fn record_at<S: Storage>(
        &self,
        store: &mut HistoryStore<S>,
        selection: &[String],
        predictions: &[Prediction],
        now: DateTime<Utc>,
    ) -> Result<HistoryEntry, MediPredictError> {
        let labels = self.labels_for(selection);

        let mut millis = now.timestamp_millis();
        if let Some(newest) = store.newest_id_millis() {
            if millis <= newest {
                millis = newest.checked_add(1).ok_or_else(|| {
                    MediPredictError::Storage(format!(
                        "History id {} leaves no room for a newer entry",
                        newest
                    ))
                })?;
            }
        }
        let date = Utc
            .timestamp_millis_opt(now.timestamp_millis())
            .single()
            .unwrap_or(now);

        let entry = HistoryEntry::new(millis.to_string(), date, labels, predictions.to_vec());
        store.append(entry.clone())?;
        debug!(
            "Recorded history entry {} with {} predictions",
            entry.id(),
            entry.predictions().len()
        );
        Ok(entry)
    }

    fn labels_for(&self, selection: &[String]) -> Vec<String> {
        selection
            .iter()
            .filter_map(|id| match self.catalog.label_of(id) {
                Some(label) => Some(label.to_string()),
                None => {
                    warn!("Dropping unknown symptom id '{}' from history entry", id);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::RuleEngine;
    use crate::storage::MemoryStorage;

    fn selection(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_record_resolves_labels_in_order() {
        let recorder = SessionRecorder::default();
        let mut store = HistoryStore::open(MemoryStorage::new());
        let sel = selection(&["sore_throat", "fever"]);
        let predictions = RuleEngine::default().infer(&sel);

        let entry = recorder
            .record_at(&mut store, &sel, &predictions, at(1_700_000_000_123))
            .unwrap();

        assert_eq!(entry.id(), "1700000000123");
        assert_eq!(entry.symptoms(), &["Sore Throat", "Fever"]);
        assert_eq!(entry.predictions(), predictions.as_slice());
        assert_eq!(store.list()[0], entry);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let recorder = SessionRecorder::default();
        let mut store = HistoryStore::open(MemoryStorage::new());
        let sel = selection(&["fever", "retired_symptom", "rash"]);
        let predictions = RuleEngine::default().infer(&sel);

        let entry = recorder
            .record_at(&mut store, &sel, &predictions, at(1))
            .unwrap();
        assert_eq!(entry.symptoms(), &["Fever", "Rash"]);
    }

    #[test]
    fn test_same_millisecond_gets_distinct_ids() {
        let recorder = SessionRecorder::default();
        let mut store = HistoryStore::open(MemoryStorage::new());
        let sel = selection(&["rash"]);
        let predictions = RuleEngine::default().infer(&sel);

        let first = recorder
            .record_at(&mut store, &sel, &predictions, at(5_000))
            .unwrap();
        let second = recorder
            .record_at(&mut store, &sel, &predictions, at(5_000))
            .unwrap();

        assert_eq!(first.id(), "5000");
        assert_eq!(second.id(), "5001");
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].id(), "5001");
    }

    #[test]
    fn test_clock_going_backwards_still_increases_ids() {
        let recorder = SessionRecorder::default();
        let mut store = HistoryStore::open(MemoryStorage::new());
        let sel = selection(&["rash"]);
        let predictions = RuleEngine::default().infer(&sel);

        recorder
            .record_at(&mut store, &sel, &predictions, at(9_000))
            .unwrap();
        let later = recorder
            .record_at(&mut store, &sel, &predictions, at(3_000))
            .unwrap();
        assert_eq!(later.id(), "9001");
        assert_eq!(later.date(), at(3_000));
    }

    #[test]
    fn test_max_stored_id_is_an_error_not_overflow() {
        let storage = MemoryStorage::with_data(
            r#"[{"id":"9223372036854775807","date":"2023-11-14T22:13:20.000Z","symptoms":["Rash"],"predictions":[]}]"#,
        );
        let mut store = HistoryStore::open(storage.clone());
        assert!(store.discarded_on_load().is_none());

        let sel = selection(&["rash"]);
        let predictions = RuleEngine::default().infer(&sel);
        let err = SessionRecorder::default()
            .record(&mut store, &sel, &predictions)
            .unwrap_err();

        assert!(matches!(err, MediPredictError::Storage(_)));
        assert_eq!(store.len(), 1);
        assert!(storage.raw().unwrap().contains("9223372036854775807"));
    }

    #[test]
    fn test_failed_append_surfaces_error() {
        let recorder = SessionRecorder::default();
        let storage = MemoryStorage::new();
        let mut store = HistoryStore::open(storage.clone());
        storage.set_fail_saves(true);

        let sel = selection(&["rash"]);
        let predictions = RuleEngine::default().infer(&sel);
        let err = recorder
            .record_at(&mut store, &sel, &predictions, at(1))
            .unwrap_err();
        assert!(matches!(err, MediPredictError::Storage(_)));
        assert!(store.is_empty());
    }
}
