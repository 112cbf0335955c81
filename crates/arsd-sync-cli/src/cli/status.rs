//! Report how fresh the stored session is.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::freshness::{self, CREDENTIAL_MAX_AGE_DAYS, DATA_MAX_AGE_DAYS};
use crate::store::SqliteStore;

fn describe(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match at {
        Some(at) => {
            let age = now - at;
            if age.num_days() > 0 {
                format!("{} ({} days ago)", at.to_rfc3339(), age.num_days())
            } else {
                format!("{} ({} hours ago)", at.to_rfc3339(), age.num_hours())
            }
        }
        None => "never".to_string(),
    }
}

/// Print credential and data age against the freshness rules.
pub fn run(store_path: &Path, json: bool) -> Result<()> {
    let store = SqliteStore::open(store_path)?;
    let now = Utc::now();
    let freshness = freshness::check(&store, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&freshness)?);
        return Ok(());
    }

    println!("ARSD Sync Status");
    println!("================");
    println!("Store:       {}", store_path.display());
    println!("Logged in:   {}", describe(freshness.logged_in_at, now));
    println!("Last sync:   {}", describe(freshness.synced_at, now));
    println!();
    if freshness.credentials_expired {
        println!("[!!] Credentials missing or older than {CREDENTIAL_MAX_AGE_DAYS} days. Sync with --roll, --name and --dob.");
    } else {
        println!("[OK] Credentials valid");
    }
    if freshness.needs_sync {
        println!("[!!] Data missing or older than {DATA_MAX_AGE_DAYS} days. Run `arsd-sync sync`.");
    } else {
        println!("[OK] Data up to date");
    }
    Ok(())
}
