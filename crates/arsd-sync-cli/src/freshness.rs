//! How long stored credentials and records stay usable.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

use arsd_sync::store::keys;
use arsd_sync::{Credentials, RecordStore, SyncResult};

/// Stored credentials are dropped after this long.
pub const CREDENTIAL_MAX_AGE_DAYS: i64 = 30;

/// Stored records call for a new sync after this long.
pub const DATA_MAX_AGE_DAYS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub logged_in_at: Option<DateTime<Utc>>,
    pub synced_at: Option<DateTime<Utc>>,
    pub credentials_expired: bool,
    pub needs_sync: bool,
}

fn timestamp(value: Option<Value>) -> Option<DateTime<Utc>> {
    let raw = value?;
    DateTime::parse_from_rfc3339(raw.as_str()?)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Evaluate both rules at `now`. A missing or unreadable timestamp counts
/// as expired.
pub fn check(store: &dyn RecordStore, now: DateTime<Utc>) -> SyncResult<Freshness> {
    let logged_in_at = timestamp(store.get(keys::LOGIN_TIMESTAMP)?);
    let synced_at = timestamp(store.get(keys::DATA_TIMESTAMP)?);

    let older_than = |at: Option<DateTime<Utc>>, days: i64| {
        at.map_or(true, |at| now - at > Duration::days(days))
    };

    Ok(Freshness {
        logged_in_at,
        synced_at,
        credentials_expired: older_than(logged_in_at, CREDENTIAL_MAX_AGE_DAYS),
        needs_sync: older_than(synced_at, DATA_MAX_AGE_DAYS),
    })
}

/// Stored credentials that are still within their lifetime. Expired ones
/// are removed along with their timestamp.
pub fn usable_credentials(
    store: &mut dyn RecordStore,
    now: DateTime<Utc>,
) -> SyncResult<Option<Credentials>> {
    let Some(raw) = store.get(keys::CREDENTIALS)? else {
        return Ok(None);
    };

    if check(store, now)?.credentials_expired {
        tracing::info!("stored credentials expired, removing");
        store.remove(keys::CREDENTIALS)?;
        store.remove(keys::LOGIN_TIMESTAMP)?;
        return Ok(None);
    }

    match serde_json::from_value::<Credentials>(raw) {
        Ok(creds) => Ok(Some(creds)),
        Err(e) => {
            tracing::warn!("ignoring unreadable stored credentials: {e}");
            Ok(None)
        }
    }
}
