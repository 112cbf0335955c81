//! Browser backing for [`arsd_sync::PortalPage`].

pub mod chromium;

pub use chromium::{ChromiumPage, LaunchOptions, CHROMIUM_ENV};
