//! SQLite-backed record store.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use arsd_sync::{RecordStore, SyncError, SyncResult};

/// One JSON value per key, in a single `records` table.
pub struct SqliteStore {
    db: Connection,
}

fn store_err(e: impl std::fmt::Display) -> SyncError {
    SyncError::Store(e.to_string())
}

impl SqliteStore {
    /// Open or create a store, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let db = Connection::open(path)
            .with_context(|| format!("failed to open store: {}", path.display()))?;

        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .context("failed to create records table")?;

        Ok(Self { db })
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.db.prepare("SELECT key FROM records ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, key: &str) -> SyncResult<Option<Value>> {
        let raw: Option<String> = self
            .db
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(store_err)?;

        raw.map(|raw| serde_json::from_str(&raw).map_err(store_err))
            .transpose()
    }

    fn put(&mut self, key: &str, value: Value) -> SyncResult<()> {
        let raw = serde_json::to_string(&value).map_err(store_err)?;
        self.db
            .execute(
                "INSERT OR REPLACE INTO records (key, value, updated_at)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                params![key, raw],
            )
            .map_err(store_err)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SyncResult<()> {
        self.db
            .execute("DELETE FROM records WHERE key = ?1", params![key])
            .map_err(store_err)?;
        Ok(())
    }
}
