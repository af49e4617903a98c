//! Command implementations for the gistfs CLI.
//!
//! Each command loads what it needs, performs its operation, and formats
//! output according to the requested format. The gist-reading commands split
//! into an async `run` that connects to GitHub and a synchronous core that
//! works on any loaded [`gistfs::GistFs`].

pub mod cat;
pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod ls;
pub mod stat;
