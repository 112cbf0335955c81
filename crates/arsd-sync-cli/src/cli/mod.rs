//! Subcommand implementations for the `arsd-sync` binary.

pub mod logout;
pub mod show_cmd;
pub mod status;
pub mod sync_cmd;
