//! Mentor page.

use crate::automaton::{Automaton, Step};
use crate::dom::Snapshot;
use crate::portal::ids;
use crate::timers::{settle, wait_for_element};
use crate::types::{ExtractedRecord, MentorRecord, SyncError, SyncResult};

pub fn extract_mentor(html: &str) -> MentorRecord {
    MentorRecord {
        mentor: Snapshot::parse(html).text(ids::MENTOR_NAME),
    }
}

impl Automaton<'_> {
    pub(crate) async fn handle_mentor(&mut self) -> SyncResult<Step> {
        let config = self.config;

        let Some(html) = wait_for_element(&*self.page, &config.timings, ids::MENTOR_NAME).await?
        else {
            return Ok(self.fail(SyncError::extraction_timeout("mentor")));
        };

        self.bridge.log("Extracting mentor...");
        self.bridge.record(ExtractedRecord::Mentor(extract_mentor(&html)));

        settle(config.timings.page_settle()).await;
        self.navigate(config.portal.attendance_url()).await?;
        Ok(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mentor() {
        let html = r#"<p>Mentor: <span id="lblmentorname"> Dr. Kavita Rao </span></p>"#;
        assert_eq!(extract_mentor(html).mentor, "Dr. Kavita Rao");
    }
}
