//! Faculty page, the last stop of a run.

use crate::automaton::{Automaton, Step};
use crate::dom::Snapshot;
use crate::portal::ids;
use crate::table::rows;
use crate::timers::{settle, wait_for_element};
use crate::types::{ExtractedRecord, FacultyList, SyncResult};

/// One entry per data row of the faculty table, keyed by its headers.
/// Empty when the table is absent.
pub fn extract_faculty(html: &str) -> FacultyList {
    Snapshot::parse(html)
        .table(ids::RESULTS_TABLE)
        .map(|table| rows(&table))
        .unwrap_or_default()
}

impl Automaton<'_> {
    pub(crate) async fn handle_faculty(&mut self) -> SyncResult<Step> {
        let config = self.config;

        let html = match wait_for_element(&*self.page, &config.timings, ids::RESULTS_TABLE).await? {
            Some(html) => html,
            None => {
                tracing::warn!("faculty table never appeared, reporting no faculty");
                self.page.content().await?
            }
        };

        self.bridge.log("Extracting faculty details...");
        self.bridge
            .record(ExtractedRecord::Faculty(extract_faculty(&html)));

        // Let the host persist the records before the run is declared done.
        settle(config.timings.faculty_settle()).await;
        self.bridge.complete();
        Ok(Step::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_faculty() {
        let html = r#"<table id="gvshow">
            <tr><th>Paper</th><th>Teacher</th></tr>
            <tr><td>Data Structures</td><td>Dr. A. Sharma</td></tr>
            <tr></tr>
            <tr><td>Operating Systems</td></tr>
            </table>"#;
        let faculty = extract_faculty(html);
        assert_eq!(faculty.len(), 2);
        assert_eq!(faculty[0].get("Teacher"), Some("Dr. A. Sharma"));
        assert_eq!(faculty[1].get("Paper"), Some("Operating Systems"));
        assert_eq!(faculty[1].get("Teacher"), None);
    }

    #[test]
    fn test_missing_table() {
        assert!(extract_faculty("<p>No records</p>").is_empty());
    }
}
