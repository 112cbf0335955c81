//! Host side of a run.
//!
//! The supervisor owns the [`SessionState`], builds an [`Automaton`] around
//! the page it is given, and consumes the automaton's envelopes in the same
//! task. Each message is mapped to an observer callback or a store write.
//! The run ends at the first terminal message, a transport failure, or the
//! run deadline; in every case the automaton future is dropped.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use crate::automaton::Automaton;
use crate::bridge::{self, Inbox, Message};
use crate::config::SyncConfig;
use crate::page::PortalPage;
use crate::session::SessionState;
use crate::store::{keys, put_record, RecordStore};
use crate::types::{Credentials, SyncError, SyncResult};

/// Status passed to [`SyncObserver::on_finish`].
pub const FINISHED: &str = "DONE";

/// Receives user-facing run events.
pub trait SyncObserver: Send {
    fn on_progress(&mut self, message: &str);
    fn on_finish(&mut self, status: &str);
    fn on_error(&mut self, message: &str);
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    Failed { message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Where a run's credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignIn {
    /// Typed in for this run. Completing it restarts the credential lifetime.
    Entered,
    /// Reused from the store; only the data timestamp moves.
    Stored,
}

/// What the message loop stopped on.
enum Ending {
    Complete,
    Error(String),
}

pub struct SessionSupervisor<O, S> {
    config: SyncConfig,
    observer: O,
    store: S,
    state: SessionState,
}

impl<O: SyncObserver, S: RecordStore> SessionSupervisor<O, S> {
    pub fn new(config: SyncConfig, observer: O, store: S) -> Self {
        Self {
            config,
            observer,
            store,
            state: SessionState::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// State left by the most recent run.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (O, S) {
        (self.observer, self.store)
    }

    /// Drive one run over `page`, which should already be at the login URL.
    ///
    /// Exactly one of `on_finish` or `on_error` fires before this returns.
    pub async fn run(
        &mut self,
        page: &mut dyn PortalPage,
        credentials: &Credentials,
        sign_in: SignIn,
    ) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id);
        self.run_inner(page, credentials, sign_in)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &mut self,
        page: &mut dyn PortalPage,
        credentials: &Credentials,
        sign_in: SignIn,
    ) -> RunOutcome {
        self.state = SessionState::new();

        if let Err(e) = credentials.validate() {
            return self.report(Err(e));
        }

        tracing::info!(roll = %credentials.roll_number, ?sign_in, "run started");
        let deadline = self.config.timings.run_timeout();
        let (bridge, inbox) = bridge::channel();
        let Self {
            config,
            observer,
            store,
            state,
        } = &mut *self;
        let automaton = Automaton::new(page, credentials, config, bridge).run(state);
        let ending = consume(
            inbox,
            automaton,
            deadline,
            Persist {
                credentials,
                sign_in,
                observer,
                store,
            },
        )
        .await;
        self.report(ending)
    }

    /// Consume envelopes from an automaton driven by the caller, for hosts
    /// whose page runs somewhere else and reaches us only through `inbox`.
    ///
    /// Same callbacks, persistence and deadline as [`run`](Self::run).
    pub async fn supervise<F>(
        &mut self,
        inbox: Inbox,
        automaton: F,
        credentials: &Credentials,
        sign_in: SignIn,
    ) -> RunOutcome
    where
        F: Future<Output = SyncResult<()>>,
    {
        let deadline = self.config.timings.run_timeout();
        let ending = consume(
            inbox,
            automaton,
            deadline,
            Persist {
                credentials,
                sign_in,
                observer: &mut self.observer,
                store: &mut self.store,
            },
        )
        .await;
        self.report(ending)
    }

    fn report(&mut self, ending: SyncResult<Ending>) -> RunOutcome {
        let message = match ending {
            Ok(Ending::Complete) => {
                tracing::info!("run finished");
                self.observer.on_finish(FINISHED);
                return RunOutcome::Finished;
            }
            Ok(Ending::Error(message)) => message,
            Err(e) => e.to_string(),
        };
        tracing::warn!(%message, "run failed");
        self.observer.on_error(&message);
        RunOutcome::Failed { message }
    }
}

/// Where envelopes from one run land.
struct Persist<'a> {
    credentials: &'a Credentials,
    sign_in: SignIn,
    observer: &'a mut dyn SyncObserver,
    store: &'a mut dyn RecordStore,
}

async fn consume<F>(
    mut inbox: Inbox,
    automaton: F,
    deadline: Duration,
    mut sink: Persist<'_>,
) -> SyncResult<Ending>
where
    F: Future<Output = SyncResult<()>>,
{
    let drain = async {
        tokio::pin!(automaton);

        // Set once the automaton has returned; the inbox still drains after.
        let mut stopped: Option<SyncResult<()>> = None;
        loop {
            tokio::select! {
                biased;
                next = inbox.recv() => match next {
                    Some(Ok(message)) => match dispatch(message, &mut sink) {
                        Ok(None) => {}
                        Ok(Some(ending)) => return Ok(ending),
                        Err(e) => return Err(e),
                    },
                    Some(Err(e)) => return Err(e),
                    None => {
                        return match stopped {
                            Some(Err(e)) => Err(e),
                            _ => Err(SyncError::Transport(
                                "automaton stopped without a result".to_string(),
                            )),
                        };
                    }
                },
                result = &mut automaton, if stopped.is_none() => {
                    if let Err(e) = &result {
                        tracing::warn!("automaton failed: {e}");
                    }
                    stopped = Some(result);
                }
            }
        }
    };

    match tokio::time::timeout(deadline, drain).await {
        Ok(ending) => ending,
        Err(_) => {
            tracing::warn!(?deadline, "run deadline passed");
            Err(SyncError::HostTimeout)
        }
    }
}

/// Apply one message. Returns the ending for terminal messages.
fn dispatch(message: Message, sink: &mut Persist<'_>) -> SyncResult<Option<Ending>> {
    match message {
        Message::Log { message } => {
            sink.observer.on_progress(&message);
            Ok(None)
        }
        Message::Error { message } => Ok(Some(Ending::Error(message))),
        Message::Complete {} => {
            save_session(sink.credentials, sink.sign_in, &mut *sink.store)?;
            Ok(Some(Ending::Complete))
        }
        data => {
            if let Some(record) = data.into_record() {
                put_record(&mut *sink.store, &record)?;
            }
            Ok(None)
        }
    }
}

/// Stamp the data timestamp. A sign-in with entered credentials also
/// stores them and restarts the credential lifetime.
fn save_session(
    credentials: &Credentials,
    sign_in: SignIn,
    store: &mut dyn RecordStore,
) -> SyncResult<()> {
    let now = serde_json::Value::String(Utc::now().to_rfc3339());
    if sign_in == SignIn::Entered {
        let value =
            serde_json::to_value(credentials).map_err(|e| SyncError::Store(e.to_string()))?;
        store.put(keys::CREDENTIALS, value)?;
        store.put(keys::LOGIN_TIMESTAMP, now.clone())?;
    }
    store.put(keys::DATA_TIMESTAMP, now)
}
