//! Subcommand implementations.

pub mod check;
pub mod file_names;
pub mod init;
pub mod list_rules;
pub mod output;
