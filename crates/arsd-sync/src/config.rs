//! Engine configuration: portal location and timer settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::portal::paths;

/// Default portal root. Page paths are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://www.arsdcollege.in/Internet/Student/";

/// Everything the automaton needs besides the credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub portal: PortalConfig,
    pub timings: Timings,
}

impl SyncConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Where the portal lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl PortalConfig {
    fn page(&self, path: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub fn login_url(&self) -> String {
        self.page(paths::LOGIN)
    }

    pub fn basic_details_url(&self) -> String {
        self.page(paths::BASIC_DETAILS)
    }

    pub fn mentor_url(&self) -> String {
        self.page(paths::MENTOR)
    }

    pub fn attendance_url(&self) -> String {
        self.page(paths::ATTENDANCE)
    }

    pub fn faculty_url(&self) -> String {
        self.page(paths::FACULTY)
    }
}

/// Timer settings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Interval between element presence checks.
    pub poll_interval_ms: u64,
    /// Give up on a required element after this long.
    pub element_timeout_ms: u64,
    /// Pause between filling the login form and clicking submit.
    pub login_settle_ms: u64,
    /// Maximum time on the login page after submitting.
    pub stagnation_ms: u64,
    /// Pause after emitting a record before navigating on.
    pub page_settle_ms: u64,
    /// Pause between choosing an attendance filter and resubmitting.
    pub filter_settle_ms: u64,
    /// Pause between the faculty record and `complete`.
    pub faculty_settle_ms: u64,
    /// Host-side deadline for the whole run.
    pub run_timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            element_timeout_ms: 10_000,
            login_settle_ms: 1_000,
            stagnation_ms: 15_000,
            page_settle_ms: 800,
            filter_settle_ms: 500,
            faculty_settle_ms: 1_500,
            run_timeout_ms: 120_000,
        }
    }
}

impl Timings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn login_settle(&self) -> Duration {
        Duration::from_millis(self.login_settle_ms)
    }

    pub fn stagnation(&self) -> Duration {
        Duration::from_millis(self.stagnation_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn filter_settle(&self) -> Duration {
        Duration::from_millis(self.filter_settle_ms)
    }

    pub fn faculty_settle(&self) -> Duration {
        Duration::from_millis(self.faculty_settle_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }
}
