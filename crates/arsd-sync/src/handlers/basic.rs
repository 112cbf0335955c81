//! Basic-details page: the student profile.

use crate::automaton::{Automaton, Step};
use crate::dom::Snapshot;
use crate::portal::ids;
use crate::timers::{settle, wait_for_element};
use crate::types::{Credentials, ExtractedRecord, Profile, SyncError, SyncResult};

/// Read the profile labels. Blank name or roll number fall back to what the
/// student logged in with.
pub fn extract_profile(html: &str, credentials: &Credentials) -> Profile {
    let snap = Snapshot::parse(html);
    let or_else = |value: String, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    };

    Profile {
        name: or_else(snap.text(ids::NAME), &credentials.full_name),
        roll_no: or_else(snap.text(ids::ROLL_NO), &credentials.roll_number),
        enrollment_number: snap.text(ids::ENROLLMENT_NO),
        father_name: snap.text(ids::FATHER_NAME),
        course: format!(
            "{} - {}",
            snap.text(ids::COURSE_CODE),
            snap.text(ids::COURSE_NAME)
        ),
        year: format!("{} Sem {}", snap.text(ids::PART), snap.text(ids::SEMESTER)),
        mobile: snap.text(ids::MOBILE),
        email: snap.text(ids::EMAIL),
        address: snap.text(ids::ADDRESS),
    }
}

impl Automaton<'_> {
    pub(crate) async fn handle_basic_details(&mut self) -> SyncResult<Step> {
        let config = self.config;

        let Some(html) =
            wait_for_element(&*self.page, &config.timings, ids::ENROLLMENT_NO).await?
        else {
            return Ok(self.fail(SyncError::extraction_timeout("profile")));
        };

        self.bridge.log("Extracting Profile...");
        let profile = extract_profile(&html, self.credentials);
        self.bridge.record(ExtractedRecord::Profile(profile));

        settle(config.timings.page_settle()).await;
        self.navigate(config.portal.mentor_url()).await?;
        Ok(Step::Continue)
    }
}
