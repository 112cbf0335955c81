//! Print a stored record.

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;

use arsd_sync::store::keys;
use arsd_sync::RecordStore;

use crate::store::SqliteStore;

/// Which stored record to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Record {
    Basic,
    Attendance,
    Faculty,
    Mentor,
    Credentials,
}

impl Record {
    pub fn key(self) -> &'static str {
        match self {
            Self::Basic => keys::BASIC_DETAILS,
            Self::Attendance => keys::ATTENDANCE,
            Self::Faculty => keys::FACULTY,
            Self::Mentor => keys::MENTOR,
            Self::Credentials => keys::CREDENTIALS,
        }
    }
}

/// Pretty-print a record. Returns `false` when nothing is stored for it.
pub fn run(store_path: &Path, record: Record) -> Result<bool> {
    let store = SqliteStore::open(store_path)?;
    match store.get(record.key())? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(true)
        }
        None => {
            let name = format!("{record:?}").to_lowercase();
            eprintln!("No {name} record stored. Run `arsd-sync sync` first.");
            Ok(false)
        }
    }
}
