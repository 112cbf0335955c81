//! Host-side persistence of extracted records.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{ExtractedRecord, SyncError, SyncResult};

/// Storage keys. Everything the engine writes lives under `arsd/`.
pub mod keys {
    pub const BASIC_DETAILS: &str = "arsd/basic_details";
    pub const ATTENDANCE: &str = "arsd/attendance_data";
    pub const FACULTY: &str = "arsd/faculty_data";
    pub const MENTOR: &str = "arsd/mentor_data";
    pub const CREDENTIALS: &str = "arsd/user_credentials";
    pub const LOGIN_TIMESTAMP: &str = "arsd/login_timestamp";
    pub const DATA_TIMESTAMP: &str = "arsd/data_timestamp";

    /// Every key, in the order logout clears them.
    pub const ALL: &[&str] = &[
        BASIC_DETAILS,
        ATTENDANCE,
        FACULTY,
        MENTOR,
        CREDENTIALS,
        LOGIN_TIMESTAMP,
        DATA_TIMESTAMP,
    ];
}

/// Key/value store for JSON values.
pub trait RecordStore: Send {
    fn get(&self, key: &str) -> SyncResult<Option<Value>>;
    fn put(&mut self, key: &str, value: Value) -> SyncResult<()>;
    fn remove(&mut self, key: &str) -> SyncResult<()>;

    /// Remove every key the engine writes.
    fn clear_all(&mut self) -> SyncResult<()> {
        for key in keys::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Where a record is stored.
pub fn record_key(record: &ExtractedRecord) -> &'static str {
    match record {
        ExtractedRecord::Profile(_) => keys::BASIC_DETAILS,
        ExtractedRecord::Mentor(_) => keys::MENTOR,
        ExtractedRecord::Attendance(_) => keys::ATTENDANCE,
        ExtractedRecord::Faculty(_) => keys::FACULTY,
    }
}

/// Serialize a record's payload and write it under its key.
pub fn put_record(store: &mut dyn RecordStore, record: &ExtractedRecord) -> SyncResult<()> {
    let value = match record {
        ExtractedRecord::Profile(p) => serde_json::to_value(p),
        ExtractedRecord::Mentor(m) => serde_json::to_value(m),
        ExtractedRecord::Attendance(a) => serde_json::to_value(a),
        ExtractedRecord::Faculty(f) => serde_json::to_value(f),
    }
    .map_err(|e| SyncError::Store(e.to_string()))?;
    store.put(record_key(record), value)
}

/// In-process store, used by tests and by hosts that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> SyncResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> SyncResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SyncResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
