//! Run one sync against the live portal.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;

use arsd_sync::{Credentials, RunOutcome, SessionSupervisor, SignIn};

use crate::config::load_config;
use crate::freshness;
use crate::progress::SpinnerObserver;
use crate::renderer::{ChromiumPage, LaunchOptions};
use crate::store::SqliteStore;

#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub roll: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub headful: bool,
    /// Overrides the configured run deadline, in seconds.
    pub timeout: Option<u64>,
    pub chromium: Option<PathBuf>,
    pub quiet: bool,
}

/// Credentials from the flags when all three are given, otherwise the
/// stored ones if they have not expired.
fn resolve_credentials(
    args: &SyncArgs,
    store: &mut SqliteStore,
) -> Result<(Credentials, SignIn)> {
    match (&args.roll, &args.name, &args.dob) {
        (Some(roll), Some(name), Some(dob)) => {
            Ok((Credentials::new(roll, name, dob)?, SignIn::Entered))
        }
        (None, None, None) => {
            let stored = freshness::usable_credentials(store, Utc::now())?.context(
                "no stored credentials; pass --roll, --name and --dob to sign in",
            )?;
            Ok((stored, SignIn::Stored))
        }
        _ => bail!("--roll, --name and --dob must be given together"),
    }
}

pub async fn run(store_path: &Path, config_path: &Path, args: SyncArgs) -> Result<RunOutcome> {
    let mut config = load_config(config_path)?;
    if let Some(secs) = args.timeout {
        config.timings.run_timeout_ms = secs.saturating_mul(1000);
    }

    let mut store = SqliteStore::open(store_path)?;
    let (credentials, sign_in) = resolve_credentials(&args, &mut store)?;

    let options = LaunchOptions {
        headful: args.headful,
        executable: args.chromium.clone(),
        ..LaunchOptions::default()
    };
    let login_url = config.portal.login_url();
    let mut page = ChromiumPage::launch(&login_url, &options).await?;

    let observer = if args.quiet {
        SpinnerObserver::hidden()
    } else {
        SpinnerObserver::new()
    };
    let mut supervisor = SessionSupervisor::new(config, observer, store);
    let outcome = supervisor.run(&mut page, &credentials, sign_in).await;

    if let Err(e) = page.close().await {
        tracing::warn!("{e:#}");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsd_sync::store::keys;
    use arsd_sync::RecordStore;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("records.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_flags_must_come_together() {
        let (_dir, mut store) = store();
        let args = SyncArgs {
            roll: Some("21/5678".into()),
            ..SyncArgs::default()
        };
        assert!(resolve_credentials(&args, &mut store).is_err());
    }

    #[test]
    fn test_flags_are_validated() {
        let (_dir, mut store) = store();
        let args = SyncArgs {
            roll: Some("21/5678".into()),
            name: Some("Rohan Mehta".into()),
            dob: Some("2004/08/05".into()),
            ..SyncArgs::default()
        };
        let err = resolve_credentials(&args, &mut store).unwrap_err();
        assert!(err.to_string().starts_with("Invalid credentials"));
    }

    #[test]
    fn test_no_stored_credentials() {
        let (_dir, mut store) = store();
        let err = resolve_credentials(&SyncArgs::default(), &mut store).unwrap_err();
        assert!(err.to_string().contains("no stored credentials"));
    }

    #[test]
    fn test_sign_in_source() {
        let (_dir, mut store) = store();
        let args = SyncArgs {
            roll: Some("21/5678".into()),
            name: Some("Rohan Mehta".into()),
            dob: Some("05-08-2004".into()),
            ..SyncArgs::default()
        };
        let (creds, sign_in) = resolve_credentials(&args, &mut store).unwrap();
        assert_eq!(sign_in, SignIn::Entered);

        store
            .put(keys::CREDENTIALS, serde_json::to_value(&creds).unwrap())
            .unwrap();
        store
            .put(keys::LOGIN_TIMESTAMP, Utc::now().to_rfc3339().into())
            .unwrap();
        let (stored, sign_in) = resolve_credentials(&SyncArgs::default(), &mut store).unwrap();
        assert_eq!(stored, creds);
        assert_eq!(sign_in, SignIn::Stored);
    }
}
