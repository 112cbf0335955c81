//! Shared helpers: a scripted page over static HTML fixtures.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use arsd_sync::dom::Snapshot;
use arsd_sync::{Ack, Command, Credentials, Locator, PortalPage, SyncError, SyncResult};

pub const BASE: &str = "https://www.arsdcollege.in/Internet/Student/";

pub const LOGIN: &str = include_str!("../fixtures/login.html");
pub const HOME: &str = include_str!("../fixtures/home.html");
pub const BASIC: &str = include_str!("../fixtures/basic_details.html");
pub const MENTOR: &str = include_str!("../fixtures/mentor.html");
pub const ATTENDANCE_UNFILTERED: &str = include_str!("../fixtures/attendance_unfiltered.html");
pub const ATTENDANCE_THEORY: &str = include_str!("../fixtures/attendance_theory.html");
pub const ATTENDANCE_PRACTICAL: &str = include_str!("../fixtures/attendance_practical.html");
pub const FACULTY: &str = include_str!("../fixtures/faculty.html");

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub fn creds() -> Credentials {
    Credentials::new("21/5678", "Rohan Mehta", "05-08-2004").unwrap()
}

/// One document: where it was loaded from and its HTML.
pub type Fixture = (String, String);

pub fn fixture(path: &str, html: &str) -> Fixture {
    (url(path), html.to_string())
}

/// The whole portal walk, login page first.
pub fn happy_path() -> Vec<Fixture> {
    vec![
        fixture("Login.aspx", LOGIN),
        fixture("Home.aspx", HOME),
        fixture("STD_Basic_Details.aspx", BASIC),
        fixture("STD_Mentor_Details.aspx", MENTOR),
        fixture("Attendance_Report_Monthly.aspx", ATTENDANCE_UNFILTERED),
        fixture("Attendance_Report_Monthly.aspx", ATTENDANCE_THEORY),
        fixture("Attendance_Report_Monthly.aspx", ATTENDANCE_PRACTICAL),
        fixture("Check_Student_Faculty_Details.aspx", FACULTY),
    ]
}

/// A page that shows its first fixture and advances to the next one on
/// every `wait_for_load`. Commands are checked against the current document
/// and recorded; they never change what loads next.
pub struct FixturePage {
    current: Fixture,
    queue: VecDeque<Fixture>,
    commands: Arc<Mutex<Vec<Command>>>,
    /// Fail the next load once the queue is empty, like a closed browser.
    disconnect_when_drained: bool,
}

impl FixturePage {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        let mut queue: VecDeque<Fixture> = fixtures.into();
        let current = queue
            .pop_front()
            .unwrap_or_else(|| (url("blank"), String::new()));
        Self {
            current,
            queue,
            commands: Arc::new(Mutex::new(Vec::new())),
            disconnect_when_drained: false,
        }
    }

    pub fn disconnect_when_drained(mut self) -> Self {
        self.disconnect_when_drained = true;
        self
    }

    /// Handle onto the command log that outlives the page borrow.
    pub fn command_log(&self) -> Arc<Mutex<Vec<Command>>> {
        Arc::clone(&self.commands)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn target_exists(&self, target: &Locator) -> bool {
        Snapshot::parse(&self.current.1).find(target).is_some()
    }
}

#[async_trait]
impl PortalPage for FixturePage {
    async fn url(&self) -> SyncResult<String> {
        Ok(self.current.0.clone())
    }

    async fn content(&self) -> SyncResult<String> {
        Ok(self.current.1.clone())
    }

    async fn execute(&mut self, command: &Command) -> SyncResult<Ack> {
        self.commands.lock().unwrap().push(command.clone());
        let found = match command {
            Command::Fill { target, .. }
            | Command::Select { target, .. }
            | Command::Click { target } => self.target_exists(target),
            Command::Navigate { .. } => true,
        };
        Ok(if found { Ack::Done } else { Ack::NotFound })
    }

    async fn wait_for_load(&mut self, timeout: Option<Duration>) -> SyncResult<bool> {
        if let Some(next) = self.queue.pop_front() {
            self.current = next;
            return Ok(true);
        }
        if self.disconnect_when_drained {
            return Err(SyncError::Transport("target closed".into()));
        }
        match timeout {
            Some(window) => {
                tokio::time::sleep(window).await;
                Ok(false)
            }
            None => std::future::pending().await,
        }
    }
}

/// Decoded messages left in an inbox whose bridge has been dropped.
pub async fn drain(mut inbox: arsd_sync::Inbox) -> Vec<arsd_sync::Message> {
    let mut messages = Vec::new();
    while let Some(next) = inbox.recv().await {
        messages.push(next.unwrap());
    }
    messages
}

/// `type` tags of the messages, skipping `log`.
pub fn data_tags(messages: &[arsd_sync::Message]) -> Vec<&'static str> {
    messages
        .iter()
        .map(|m| m.tag())
        .filter(|tag| *tag != "log")
        .collect()
}
