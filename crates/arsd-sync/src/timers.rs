//! Bounded polling and settling delays.
//!
//! Waits are expressed as repeated non-blocking checks on `tokio::time`, so
//! tests can run them on a paused clock.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::Timings;
use crate::dom::Snapshot;
use crate::page::PortalPage;
use crate::types::SyncResult;

/// Poll the page until `ready` holds for its HTML, checking once right away
/// and then every `poll_interval` until `element_timeout` has passed.
///
/// Returns the HTML that satisfied the check, or `None` on timeout.
pub async fn wait_until<F>(
    page: &dyn PortalPage,
    timings: &Timings,
    ready: F,
) -> SyncResult<Option<String>>
where
    F: Fn(&Snapshot) -> bool + Send + Sync,
{
    let deadline = Instant::now() + timings.element_timeout();
    loop {
        let html = page.content().await?;
        let found = ready(&Snapshot::parse(&html));
        if found {
            return Ok(Some(html));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(timings.poll_interval()).await;
    }
}

/// [`wait_until`] an element with this ID exists.
pub async fn wait_for_element(
    page: &dyn PortalPage,
    timings: &Timings,
    id: &str,
) -> SyncResult<Option<String>> {
    wait_until(page, timings, |snap| snap.exists(id)).await
}

/// Fixed pause that lets dependent page or host state settle.
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}
