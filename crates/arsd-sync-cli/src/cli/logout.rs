//! Forget the stored session.

use std::path::Path;

use anyhow::{Context, Result};

use arsd_sync::RecordStore;

use crate::store::SqliteStore;

/// Remove stored credentials, records, and timestamps.
pub fn run(store_path: &Path) -> Result<()> {
    let mut store = SqliteStore::open(store_path)?;
    store.clear_all().context("failed to clear stored records")?;
    tracing::info!(store = %store_path.display(), "session cleared");
    println!("Logged out. Stored records removed.");
    Ok(())
}
