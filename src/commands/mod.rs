//! CLI commands

pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod show;
