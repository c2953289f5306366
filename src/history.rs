//! SQLite-backed history of completed training sessions.
//!
//! The store is the persistence collaborator for the session flow: it
//! assigns record ids and creation order, lists newest-first for display,
//! and serializes the full record set for export. It owns nothing about the
//! live session; callers hand it already-flattened step values.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier assigned by the store.
pub type RecordId = i64;

/// One persisted training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: RecordId,
    pub theme: String,
    pub step1_thought: String,
    pub step2_reason: String,
    pub created_at: DateTime<Utc>,
}

/// A store failure. Always recoverable: the caller keeps its in-memory
/// state and may retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open history database at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to serialize history export")]
    Export(#[from] serde_json::Error),
}

/// History store over a single SQLite connection.
pub struct TrainingStore {
    db: Connection,
}

impl TrainingStore {
    const SCHEMA: &'static str = "
        CREATE TABLE IF NOT EXISTS trainings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            theme TEXT NOT NULL,
            step1_thought TEXT NOT NULL,
            step2_reason TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_trainings_created_at
        ON trainings(created_at);
    ";

    /// Open or create the history database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let db = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::initialize(db)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = Connection::open_in_memory()?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self, StoreError> {
        db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        db.execute_batch(Self::SCHEMA)?;
        Ok(Self { db })
    }

    /// Persist one completed session and return its assigned id.
    pub fn save(
        &mut self,
        theme: &str,
        step1_thought: &str,
        step2_reason: &str,
    ) -> Result<RecordId, StoreError> {
        let created_at = Utc::now();
        self.db.execute(
            "INSERT INTO trainings (theme, step1_thought, step2_reason, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![theme, step1_thought, step2_reason, created_at],
        )?;

        Ok(self.db.last_insert_rowid())
    }

    /// All records, newest first.
    pub fn list(&self) -> Result<Vec<TrainingRecord>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT id, theme, step1_thought, step2_reason, created_at
             FROM trainings
             ORDER BY created_at DESC, id DESC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(TrainingRecord {
                    id: row.get(0)?,
                    theme: row.get(1)?,
                    step1_thought: row.get(2)?,
                    step2_reason: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Delete by id. Returns whether a record was actually removed.
    pub fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let deleted = self
            .db
            .execute("DELETE FROM trainings WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// The full record set as a pretty-printed JSON document, newest first.
    pub fn export_json(&self) -> Result<String, StoreError> {
        let records = self.list()?;
        Ok(serde_json::to_string_pretty(&records)?)
    }
}
