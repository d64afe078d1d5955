// Slots stored as rows in a SQLite table

use super::{SlotStorage, validate_key};
use crate::task::now;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DB_FILE: &str = "tasklist.db";

/// Slots kept in a single SQLite database
pub struct SqliteStorage {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteStorage {
    /// Open or create `tasklist.db` in the given directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;

        let db_path = base_path.join(DB_FILE);
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self { base_path, db };
        storage.create_schema()?;

        Ok(storage)
    }

    /// Open a database that lives only in memory
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let storage = Self {
            base_path: PathBuf::new(),
            db,
        };
        storage.create_schema()?;
        Ok(storage)
    }

    /// Get the directory holding the database file
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating slot schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl SlotStorage for SqliteStorage {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("Failed to read slot {}", key))?;

        Ok(value)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        let tx = self.db.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, now().timestamp_millis()],
        )
        .with_context(|| format!("Failed to write slot {}", key))?;
        tx.commit()?;

        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}
