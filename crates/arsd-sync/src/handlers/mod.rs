//! Per-page handlers. Each one extracts what its page holds, emits it, and
//! starts the next navigation.
//!
//! Extraction is split into pure `extract_*` functions over HTML so it can be
//! checked against fixtures without a browser.

pub mod attendance;
pub mod basic;
pub mod faculty;
pub mod login;
pub mod mentor;

use crate::automaton::{Automaton, Step};
use crate::types::SyncResult;

impl Automaton<'_> {
    /// The post-login landing page: go straight to the profile.
    pub(crate) async fn handle_home(&mut self) -> SyncResult<Step> {
        self.bridge.log("Login success! Redirecting...");
        let url = self.config.portal.basic_details_url();
        self.navigate(url).await?;
        Ok(Step::Continue)
    }
}
