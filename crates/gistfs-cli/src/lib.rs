//! gistfs CLI library.
//!
//! Exposes the command implementations, configuration and formatters of the
//! `gistfs` binary so they can be tested against in-memory gists.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod formatters;

pub use actions::ConfigAction;
pub use cli::{ExitCode, OutputFormat};
