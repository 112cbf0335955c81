//! The page automaton abstraction.
//!
//! A `PortalPage` is one browsing context pointed at the portal. The engine
//! reads it through snapshots (`url`, `content`) and drives it with typed
//! [`Command`]s that the implementation acknowledges. Values never get spliced
//! into page scripts; implementations pass them as data.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::SyncResult;

/// How a command finds its target element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    /// `document.getElementById`.
    Id { id: String },
    /// First match of a CSS selector.
    Css { selector: String },
    /// The `index`-th element with this tag name, in document order.
    Nth { tag: String, index: usize },
}

impl Locator {
    pub fn id(id: &str) -> Self {
        Self::Id { id: id.to_string() }
    }

    pub fn css(selector: &str) -> Self {
        Self::Css {
            selector: selector.to_string(),
        }
    }

    pub fn nth(tag: &str, index: usize) -> Self {
        Self::Nth {
            tag: tag.to_string(),
            index,
        }
    }
}

/// An interaction with the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Set an input's value.
    Fill { target: Locator, value: String },
    /// Set a `<select>`'s selected index.
    Select { target: Locator, index: usize },
    /// Click a control.
    Click { target: Locator },
    /// Load a new URL in this context.
    Navigate { url: String },
}

/// Acknowledgement of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ack {
    Done,
    /// The target element does not exist on the current page.
    NotFound,
}

/// A browsing context the engine can drive.
#[async_trait]
pub trait PortalPage: Send + Sync {
    /// The current location.
    async fn url(&self) -> SyncResult<String>;

    /// Serialized HTML of the current document.
    async fn content(&self) -> SyncResult<String>;

    /// Execute one command and report whether its target was found.
    async fn execute(&mut self, command: &Command) -> SyncResult<Ack>;

    /// Wait until a new document has finished loading.
    ///
    /// Returns `Ok(false)` if `timeout` elapses first. With no timeout the
    /// wait is unbounded; the host deadline is the only bound.
    async fn wait_for_load(&mut self, timeout: Option<Duration>) -> SyncResult<bool>;
}
