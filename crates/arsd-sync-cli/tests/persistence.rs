//! Host composition: a supervised run writing into the SQLite store, then
//! the freshness rules and logout reading it back.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use arsd_sync::store::keys;
use arsd_sync::{
    Ack, Command, Credentials, PortalPage, RecordStore, SessionSupervisor, SignIn,
    SyncConfig, SyncResult,
};
use arsd_sync_cli::freshness;
use arsd_sync_cli::progress::SpinnerObserver;
use arsd_sync_cli::store::SqliteStore;

const FACULTY: &str = r#"<html><body><table id="gvshow">
    <tr><th>PAPER_NAME</th><th>TEACHER_NAME</th></tr>
    <tr><td>Data Structures</td><td>Dr. A. Sharma</td></tr>
</table></body></html>"#;

/// A page parked on the faculty listing.
struct FacultyPage;

#[async_trait]
impl PortalPage for FacultyPage {
    async fn url(&self) -> SyncResult<String> {
        Ok("https://www.arsdcollege.in/Internet/Student/Check_Student_Faculty_Details.aspx".into())
    }

    async fn content(&self) -> SyncResult<String> {
        Ok(FACULTY.to_string())
    }

    async fn execute(&mut self, _command: &Command) -> SyncResult<Ack> {
        Ok(Ack::Done)
    }

    async fn wait_for_load(&mut self, _timeout: Option<Duration>) -> SyncResult<bool> {
        Ok(false)
    }
}

fn quick_config() -> SyncConfig {
    let mut config = SyncConfig::default();
    config.timings.faculty_settle_ms = 0;
    config.timings.run_timeout_ms = 5_000;
    config
}

#[tokio::test]
async fn test_completed_run_is_fresh_and_logout_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");
    let creds = Credentials::new("21/5678", "Rohan Mehta", "05-08-2004").unwrap();

    let store = SqliteStore::open(&path).unwrap();
    let mut supervisor = SessionSupervisor::new(quick_config(), SpinnerObserver::hidden(), store);
    let outcome = supervisor.run(&mut FacultyPage, &creds, SignIn::Entered).await;
    assert!(outcome.is_success());
    drop(supervisor);

    let mut store = SqliteStore::open(&path).unwrap();
    let faculty = store.get(keys::FACULTY).unwrap().unwrap();
    assert_eq!(faculty[0]["TEACHER_NAME"], "Dr. A. Sharma");

    let status = freshness::check(&store, Utc::now()).unwrap();
    assert!(!status.credentials_expired);
    assert!(!status.needs_sync);
    assert_eq!(
        freshness::usable_credentials(&mut store, Utc::now()).unwrap(),
        Some(creds)
    );

    store.clear_all().unwrap();
    assert!(store.keys().unwrap().is_empty());
    assert!(freshness::check(&store, Utc::now()).unwrap().needs_sync);
}
