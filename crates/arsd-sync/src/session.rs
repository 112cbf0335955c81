//! Per-run state that must survive page reloads.

use crate::classifier::PageKind;
use crate::types::SubjectTable;

/// One scraped attendance view: rows and the overall percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendancePass {
    pub rows: SubjectTable,
    pub percent: String,
}

impl Default for AttendancePass {
    fn default() -> Self {
        Self {
            rows: SubjectTable::new(),
            percent: "0".to_string(),
        }
    }
}

/// State scoped to one run, owned by the supervisor and lent to the
/// automaton at every page load.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The page most recently handled.
    pub current_page: Option<PageKind>,
    /// Set just before the login click, cleared on leaving the login page.
    /// Seeing the login page again while set means the submission bounced.
    pub login_attempted: bool,
    /// Theory pass waiting for its practical counterpart.
    pub temporary_buffer: Option<AttendancePass>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
