use tracing::{info, warn};

use crate::error::MediPredictError;
use crate::storage::Storage;

use super::types::HistoryEntry;

/// Durable, newest-first log of completed predictions.
///
/// The in-memory copy always matches what was last persisted: every mutation
/// builds the new log, saves it, and only then swaps it in. A failed save
/// leaves both sides at the last-known-good state.
pub struct HistoryStore<S> {
    storage: S,
    entries: Vec<HistoryEntry>,
    discarded: Option<String>,
}

impl<S: Storage> HistoryStore<S> {
    /// Open the log from storage.
    ///
    /// Unreadable or corrupt data never fails the open: the store starts
    /// empty and the reason is logged and kept in `discarded_on_load()`.
    pub fn open(storage: S) -> Self {
        let (entries, discarded) = match storage.load() {
            Ok(None) => (Vec::new(), None),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => (dedupe(entries), None),
                Err(e) => {
                    warn!("Discarding corrupt prediction history: {}", e);
                    (Vec::new(), Some(format!("Saved history was unreadable: {}", e)))
                }
            },
            Err(e) => {
                warn!("Failed to load prediction history, starting empty: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        info!("Opened prediction history with {} entries", entries.len());
        Self {
            storage,
            entries,
            discarded,
        }
    }

    /// Insert at the head. Ids must be unique within the store.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), MediPredictError> {
        if self.entries.iter().any(|e| e.id() == entry.id()) {
            return Err(MediPredictError::Validation(format!(
                "History entry {} already exists",
                entry.id()
            )));
        }

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry);
        next.extend(self.entries.iter().cloned());
        self.commit(next)?;

        info!("Appended history entry {}", self.entries[0].id());
        Ok(())
    }

    /// Snapshot of the full log, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Remove one entry. Returns false (and writes nothing) if `id` is absent.
    pub fn delete(&mut self, id: &str) -> Result<bool, MediPredictError> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next: Vec<HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.id() != id)
            .cloned()
            .collect();
        self.commit(next)?;

        info!("Deleted history entry {}", id);
        Ok(true)
    }

    /// Drop every entry with a single write.
    pub fn clear(&mut self) -> Result<(), MediPredictError> {
        let removed = self.entries.len();
        self.commit(Vec::new())?;
        info!("Cleared {} history entries", removed);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest recorder-minted id, used to keep new ids increasing.
    pub fn newest_id_millis(&self) -> Option<i64> {
        self.entries.iter().filter_map(HistoryEntry::id_millis).max()
    }

    /// Why previously saved data was dropped on open, if it was.
    pub fn discarded_on_load(&self) -> Option<&str> {
        self.discarded.as_deref()
    }

    fn commit(&mut self, next: Vec<HistoryEntry>) -> Result<(), MediPredictError> {
        let json = serde_json::to_string(&next)
            .map_err(|e| MediPredictError::Storage(format!("Failed to serialize history: {}", e)))?;
        self.storage.save(&json).map_err(|e| {
            warn!("Failed to persist prediction history: {}", e);
            e
        })?;
        self.entries = next;
        Ok(())
    }
}

/// Keep the first occurrence of each id; stored order is newest first.
fn dedupe(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let total = entries.len();
    let mut seen = std::collections::HashSet::new();
    let unique: Vec<HistoryEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.id().to_string()))
        .collect();
    if unique.len() != total {
        warn!(
            "Dropped {} history entries with duplicate ids",
            total - unique.len()
        );
    }
    unique
}
