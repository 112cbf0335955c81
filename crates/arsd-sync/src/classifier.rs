//! Page identification from the URL and, as a last resort, the body text.

use std::fmt;

use crate::dom::Snapshot;
use crate::portal::markers;

/// Which portal page is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Login,
    BasicDetails,
    Mentor,
    Attendance,
    Faculty,
    /// Post-login landing page; only ever a transition.
    Home,
    Unknown,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::BasicDetails => write!(f, "basic details"),
            Self::Mentor => write!(f, "mentor"),
            Self::Attendance => write!(f, "attendance"),
            Self::Faculty => write!(f, "faculty"),
            Self::Home => write!(f, "home"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify by URL alone. `None` means the body text must decide.
pub fn classify_url(url: &str) -> Option<PageKind> {
    if url.to_lowercase().contains(markers::LOGIN) {
        Some(PageKind::Login)
    } else if url.contains(markers::BASIC_DETAILS) {
        Some(PageKind::BasicDetails)
    } else if url.contains(markers::MENTOR) {
        Some(PageKind::Mentor)
    } else if url.contains(markers::ATTENDANCE) {
        Some(PageKind::Attendance)
    } else if url.contains(markers::FACULTY) {
        Some(PageKind::Faculty)
    } else if url.contains(markers::HOME) {
        Some(PageKind::Home)
    } else {
        None
    }
}

/// Classify a loaded page. `html` is only parsed when the URL is not enough.
pub fn classify(url: &str, html: Option<&str>) -> PageKind {
    if let Some(kind) = classify_url(url) {
        return kind;
    }
    match html {
        Some(html) if Snapshot::parse(html).body_text().contains(markers::WELCOME) => {
            PageKind::Home
        }
        _ => PageKind::Unknown,
    }
}
