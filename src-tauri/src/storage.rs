//! Key/value persistence capability.
//!
//! Every piece of durable state (the history log, the signed-in user) is a
//! single serialized document under a well-known key. Components receive a
//! `Storage` for their key and never touch files or databases directly, so
//! tests can swap in `MemoryStorage`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::MediPredictError;

/// Storage key for the serialized history log.
pub const HISTORY_KEY: &str = "predictionHistory";
/// Storage key for the serialized signed-in user.
pub const USER_KEY: &str = "user";

/// Load/save capability for one serialized document.
pub trait Storage: Send {
    /// Read the stored document, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, MediPredictError>;
    /// Replace the stored document. Must be all-or-nothing.
    fn save(&self, data: &str) -> Result<(), MediPredictError>;
    /// Delete the stored document. Deleting a missing document is not an error.
    fn remove(&self) -> Result<(), MediPredictError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn load(&self) -> Result<Option<String>, MediPredictError> {
        (**self).load()
    }

    fn save(&self, data: &str) -> Result<(), MediPredictError> {
        (**self).save(data)
    }

    fn remove(&self) -> Result<(), MediPredictError> {
        (**self).remove()
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// In-memory storage. Clones share the same document, so a test can keep a
/// handle while a store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<Option<String>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document, e.g. corrupt data for tests.
    pub fn with_data(data: &str) -> Self {
        let storage = Self::default();
        *storage.lock() = Some(data.to_string());
        storage
    }

    /// Make every following `save` fail, simulating a full disk.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Current raw document.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.data
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, MediPredictError> {
        Ok(self.lock().clone())
    }

    fn save(&self, data: &str) -> Result<(), MediPredictError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MediPredictError::Storage("Storage quota exceeded".to_string()));
        }
        *self.lock() = Some(data.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), MediPredictError> {
        *self.lock() = None;
        Ok(())
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

/// One JSON file per key, written atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<key>.json`
    pub fn for_key(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{}.json", key)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, MediPredictError> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| MediPredictError::Storage(format!("Failed to read {:?}: {}", self.path, e)))
    }

    /// Uses a temporary file in the same directory, then renames it over the
    /// target, so an interrupted write never leaves a partial document.
    fn save(&self, data: &str) -> Result<(), MediPredictError> {
        let parent = self.path.parent().ok_or_else(|| {
            MediPredictError::Storage(format!("Path has no parent directory: {:?}", self.path))
        })?;

        std::fs::create_dir_all(parent)
            .map_err(|e| MediPredictError::Storage(format!("Failed to create data dir: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| MediPredictError::Storage(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(data.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| MediPredictError::Storage(format!("Failed to write temp file: {}", e)))?;
        temp.persist(&self.path).map_err(|e| {
            MediPredictError::Storage(format!("Failed to replace {:?}: {}", self.path, e))
        })?;

        Ok(())
    }

    fn remove(&self) -> Result<(), MediPredictError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediPredictError::Storage(format!(
                "Failed to remove {:?}: {}",
                self.path, e
            ))),
        }
    }
}

// =============================================================================
// SQLITE
// =============================================================================

/// A row in a shared SQLite key/value table.
/// All operations are synchronous (rusqlite is blocking) and touch one row,
/// so each save is a single atomic statement.
pub struct SqliteStorage {
    conn: Connection,
    key: String,
}

impl SqliteStorage {
    /// Create or open the database and bind this handle to `key`.
    pub fn open(db_path: &Path, key: &str) -> Result<Self, MediPredictError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MediPredictError::Storage(format!("Failed to create data dir: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| MediPredictError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )
        .map_err(|e| MediPredictError::Storage(format!("Failed to create table: {}", e)))?;

        info!("Opened key/value store at {:?} for key '{}'", db_path, key);
        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }
}

impl Storage for SqliteStorage {
    fn load(&self) -> Result<Option<String>, MediPredictError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| MediPredictError::Storage(format!("Failed to read '{}': {}", self.key, e)))
    }

    fn save(&self, data: &str) -> Result<(), MediPredictError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))",
                params![self.key, data],
            )
            .map_err(|e| {
                MediPredictError::Storage(format!("Failed to write '{}': {}", self.key, e))
            })?;
        Ok(())
    }

    fn remove(&self) -> Result<(), MediPredictError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![self.key])
            .map_err(|e| {
                MediPredictError::Storage(format!("Failed to delete '{}': {}", self.key, e))
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(storage: &dyn Storage) {
        assert_eq!(storage.load().unwrap(), None);

        storage.save("[1]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[1]"));

        storage.save("[2]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[2]"));

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        storage.remove().unwrap();
    }

    #[test]
    fn test_memory_storage() {
        exercise(&MemoryStorage::new());
    }

    #[test]
    fn test_memory_storage_clones_share_data() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.save("x").unwrap();
        assert_eq!(b.raw().as_deref(), Some("x"));
    }

    #[test]
    fn test_memory_storage_failing_save_keeps_old_data() {
        let storage = MemoryStorage::with_data("old");
        storage.set_fail_saves(true);
        assert!(storage.save("new").is_err());
        assert_eq!(storage.raw().as_deref(), Some("old"));
    }

    #[test]
    fn test_file_storage() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::for_key(&dir.path().join("nested"), HISTORY_KEY);
        assert!(storage.path().ends_with("predictionHistory.json"));
        exercise(&storage);
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::for_key(dir.path(), USER_KEY);
        storage.save("{}").unwrap();
        storage.save("{\"a\":1}").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["user.json".to_string()]);
    }

    #[test]
    fn test_sqlite_storage() {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStorage::open(&dir.path().join("medipredict.db"), HISTORY_KEY).unwrap();
        exercise(&storage);
    }

    #[test]
    fn test_sqlite_keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("medipredict.db");
        let history = SqliteStorage::open(&db, HISTORY_KEY).unwrap();
        let user = SqliteStorage::open(&db, USER_KEY).unwrap();

        history.save("[]").unwrap();
        user.save("{}").unwrap();
        user.remove().unwrap();

        assert_eq!(history.load().unwrap().as_deref(), Some("[]"));
        assert_eq!(user.load().unwrap(), None);
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let inner = MemoryStorage::new();
        let boxed: Box<dyn Storage> = Box::new(inner.clone());
        boxed.save("boxed").unwrap();
        assert_eq!(inner.raw().as_deref(), Some("boxed"));
    }
}
