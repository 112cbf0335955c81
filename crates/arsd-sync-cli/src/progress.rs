//! Terminal progress for a sync run.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use arsd_sync::SyncObserver;

/// Shows progress messages on a spinner and remembers how the run ended.
pub struct SpinnerObserver {
    bar: ProgressBar,
    failure: Option<String>,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message("Opening portal...");
        Self { bar, failure: None }
    }

    /// A spinner that draws nothing, for quiet runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            failure: None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl Default for SpinnerObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncObserver for SpinnerObserver {
    fn on_progress(&mut self, message: &str) {
        tracing::debug!(%message, "progress");
        self.bar.set_message(message.to_string());
    }

    fn on_finish(&mut self, status: &str) {
        self.bar.finish_with_message(format!("Sync complete ({status})"));
    }

    fn on_error(&mut self, message: &str) {
        self.failure = Some(message.to_string());
        self.bar.abandon_with_message(format!("Sync failed: {message}"));
    }
}
