//! ARSD Sync: automation engine that logs a student into the ARSD College
//! portal and walks its pages, extracting profile, mentor, attendance, and
//! faculty records for a host.

pub mod automaton;
pub mod bridge;
pub mod classifier;
pub mod config;
pub mod dom;
pub mod handlers;
pub mod page;
pub mod portal;
pub mod session;
pub mod store;
pub mod supervisor;
pub mod table;
pub mod timers;
pub mod types;

pub use automaton::{Automaton, Step};
pub use bridge::{Bridge, Inbox, Message};
pub use classifier::{classify, PageKind};
pub use config::{PortalConfig, SyncConfig, Timings};
pub use page::{Ack, Command, Locator, PortalPage};
pub use session::{AttendancePass, SessionState};
pub use store::{MemoryStore, RecordStore};
pub use supervisor::{RunOutcome, SessionSupervisor, SignIn, SyncObserver};
pub use types::*;
