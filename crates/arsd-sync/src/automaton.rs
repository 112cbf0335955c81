//! The navigation state machine.
//!
//! The automaton reacts to page loads: classify the page, run its handler,
//! then wait for the next document. Handlers live in [`crate::handlers`]; each
//! returns a [`Step`] telling the loop how to wait.

use std::time::Duration;

use crate::bridge::Bridge;
use crate::classifier::{classify, classify_url, PageKind};
use crate::config::SyncConfig;
use crate::page::{Ack, Command, Locator, PortalPage};
use crate::session::SessionState;
use crate::types::{Credentials, SyncError, SyncResult};

/// What to do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A navigation or submission is under way; wait for it.
    Continue,
    /// Like `Continue`, but fail if the page is still the login page when
    /// the window closes without a new document.
    Watch(Duration),
    /// Nothing recognized; wait for whatever loads next.
    Idle,
    /// A terminal message has been emitted.
    Done,
}

/// Drives one browsing context through the portal for one run.
pub struct Automaton<'a> {
    pub(crate) page: &'a mut dyn PortalPage,
    pub(crate) credentials: &'a Credentials,
    pub(crate) config: &'a SyncConfig,
    pub(crate) bridge: Bridge,
}

impl<'a> Automaton<'a> {
    pub fn new(
        page: &'a mut dyn PortalPage,
        credentials: &'a Credentials,
        config: &'a SyncConfig,
        bridge: Bridge,
    ) -> Self {
        Self {
            page,
            credentials,
            config,
            bridge,
        }
    }

    /// Handle the current page, then every page that loads after it, until a
    /// handler emits a terminal message.
    ///
    /// `Err` means the page itself failed (browser gone, script error); the
    /// host reports those as transport failures.
    pub async fn run(mut self, state: &mut SessionState) -> SyncResult<()> {
        let mut step = self.on_page_load(state).await?;
        loop {
            match step {
                Step::Done => return Ok(()),
                Step::Watch(window) => {
                    let loaded = self.page.wait_for_load(Some(window)).await?;
                    if !loaded && self.still_on_login().await? {
                        // The click was accepted but the redirect never came.
                        state.login_attempted = false;
                        self.fail(SyncError::server_not_responding());
                        return Ok(());
                    }
                }
                Step::Continue | Step::Idle => {
                    self.page.wait_for_load(None).await?;
                }
            }
            step = self.on_page_load(state).await?;
        }
    }

    /// Classify the loaded page and dispatch to its handler.
    pub async fn on_page_load(&mut self, state: &mut SessionState) -> SyncResult<Step> {
        let url = self.page.url().await?;
        let kind = match classify_url(&url) {
            Some(kind) => kind,
            None => {
                let html = self.page.content().await?;
                classify(&url, Some(&html))
            }
        };
        tracing::debug!(%url, page = %kind, "page loaded");

        if state.login_attempted && !matches!(kind, PageKind::Login | PageKind::Unknown) {
            tracing::info!(page = %kind, "login accepted");
            state.login_attempted = false;
        }
        state.current_page = Some(kind);

        match kind {
            PageKind::Login => self.handle_login(state).await,
            PageKind::BasicDetails => self.handle_basic_details().await,
            PageKind::Mentor => self.handle_mentor().await,
            PageKind::Attendance => self.handle_attendance(state).await,
            PageKind::Faculty => self.handle_faculty().await,
            PageKind::Home => self.handle_home().await,
            PageKind::Unknown => {
                tracing::warn!(%url, "unrecognized page, waiting");
                Ok(Step::Idle)
            }
        }
    }

    async fn still_on_login(&self) -> SyncResult<bool> {
        let url = self.page.url().await?;
        Ok(classify_url(&url) == Some(PageKind::Login))
    }

    /// Emit a classified failure and end the run.
    pub(crate) fn fail(&self, err: SyncError) -> Step {
        tracing::warn!("run failed: {err}");
        self.bridge.error(&err);
        Step::Done
    }

    /// Execute a command, logging targets that were not found.
    pub(crate) async fn command(&mut self, command: Command) -> SyncResult<Ack> {
        tracing::debug!(?command, "execute");
        let ack = self.page.execute(&command).await?;
        if ack == Ack::NotFound {
            tracing::warn!(?command, "command target not found");
        }
        Ok(ack)
    }

    pub(crate) async fn navigate(&mut self, url: String) -> SyncResult<()> {
        self.command(Command::Navigate { url }).await?;
        Ok(())
    }

    pub(crate) async fn fill(&mut self, id: &str, value: &str) -> SyncResult<Ack> {
        self.command(Command::Fill {
            target: Locator::id(id),
            value: value.to_string(),
        })
        .await
    }
}
