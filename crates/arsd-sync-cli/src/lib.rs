//! ARSD Sync command-line host: Chromium pages, SQLite persistence, and the
//! subcommands built on them.

pub mod cli;
pub mod config;
pub mod freshness;
pub mod progress;
pub mod renderer;
pub mod store;
