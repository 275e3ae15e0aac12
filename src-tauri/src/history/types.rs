use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inference::Prediction;

/// One completed prediction, as kept in the history log.
///
/// Symptom labels and predictions are snapshots taken when the entry was
/// recorded; later catalog or rule changes do not affect them. There is no
/// public constructor: entries come from the session recorder, from storage,
/// or from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: String,
    date: DateTime<Utc>,
    symptoms: Vec<String>,
    predictions: Vec<Prediction>,
}

impl HistoryEntry {
    pub(crate) fn new(
        id: String,
        date: DateTime<Utc>,
        symptoms: Vec<String>,
        predictions: Vec<Prediction>,
    ) -> Self {
        Self {
            id,
            date,
            symptoms,
            predictions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Symptom labels in selection order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// The id as epoch milliseconds, for ids minted by the recorder.
    pub fn id_millis(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}
