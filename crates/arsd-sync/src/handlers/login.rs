//! Login page: loop detection, form filling, and submission.

use crate::automaton::{Automaton, Step};
use crate::dom::Snapshot;
use crate::page::{Ack, Command, Locator};
use crate::portal::{ids, SUBMIT_FALLBACK_SELECTOR};
use crate::session::SessionState;
use crate::timers::{settle, wait_for_element};
use crate::types::{Credentials, SyncError, SyncResult};

/// Selects before the date-of-birth trio (the page's first select is the
/// course picker).
const DOB_SELECT_OFFSET: usize = 1;

/// The form needs this many selects for the date of birth to be filled.
const MIN_SELECTS: usize = 4;

/// `(select index, option index)` for the day, month, and year selects.
///
/// Components with no matching option are skipped.
pub fn dob_selections(html: &str, credentials: &Credentials) -> Vec<(usize, usize)> {
    let snap = Snapshot::parse(html);
    if snap.count("select") < MIN_SELECTS {
        return Vec::new();
    }
    credentials
        .dob_parts()
        .iter()
        .enumerate()
        .filter_map(|(i, part)| {
            let select_index = DOB_SELECT_OFFSET + i;
            let control = snap.select(&Locator::nth("select", select_index))?;
            control.position(part).map(|option| (select_index, option))
        })
        .collect()
}

/// The submit button, or any submit input when it has no ID.
pub fn submit_locator(html: &str) -> Option<Locator> {
    let snap = Snapshot::parse(html);
    [Locator::id(ids::SUBMIT), Locator::css(SUBMIT_FALLBACK_SELECTOR)]
        .into_iter()
        .find(|locator| snap.find(locator).is_some())
}

impl Automaton<'_> {
    pub(crate) async fn handle_login(&mut self, state: &mut SessionState) -> SyncResult<Step> {
        // Back on the login page after submitting: the portal bounced us.
        if state.login_attempted {
            state.login_attempted = false;
            return Ok(self.fail(SyncError::CredentialsRejected));
        }

        let config = self.config;
        let credentials = self.credentials;

        let Some(html) = wait_for_element(&*self.page, &config.timings, ids::ROLL_NO_INPUT).await?
        else {
            return Ok(self.fail(SyncError::login_not_loading()));
        };

        self.bridge.log("Verifying credentials...");
        self.fill(ids::ROLL_NO_INPUT, &credentials.roll_number).await?;
        self.fill(ids::NAME_INPUT, &credentials.full_name).await?;
        for (select_index, option) in dob_selections(&html, credentials) {
            self.command(Command::Select {
                target: Locator::nth("select", select_index),
                index: option,
            })
            .await?;
        }

        settle(config.timings.login_settle()).await;

        let html = self.page.content().await?;
        let Some(submit) = submit_locator(&html) else {
            return Ok(self.fail(SyncError::login_not_loading()));
        };

        // Set before clicking so the flag is in place when the reload lands.
        state.login_attempted = true;
        if self.command(Command::Click { target: submit }).await? == Ack::NotFound {
            state.login_attempted = false;
            return Ok(self.fail(SyncError::login_not_loading()));
        }

        Ok(Step::Watch(config.timings.stagnation()))
    }
}
