//! `stat` command: show metadata of a file or of the root.

use super::common::{EntryView, GistOptions, open_gist};
use crate::cli::{ExitCode, OutputFormat};
use crate::config::Config;
use crate::formatters::format_output;
use anyhow::Result;
use gistfs::{File, GistFs};

/// Returns metadata for `name`, or for the root when `name` is `None`.
///
/// Goes through an open handle so the result matches what readers see.
///
/// # Errors
///
/// Returns an error if `name` does not exist.
pub fn stat_entry(fs: &GistFs, name: Option<&str>) -> Result<EntryView> {
    let handle = fs.open(name.unwrap_or("."))?;
    let meta = handle.stat()?;
    handle.close()?;
    Ok(EntryView::from(&meta))
}

/// Runs the `stat` command.
///
/// # Errors
///
/// Returns an error if the gist cannot be loaded or `name` does not exist.
pub async fn run(
    gist_id: &str,
    name: Option<&str>,
    options: &GistOptions,
    config: &Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let fs = open_gist(gist_id, options, config).await?;
    let entry = stat_entry(&fs, name)?;
    println!("{}", format_output(&entry, output_format)?);
    Ok(ExitCode::SUCCESS)
}
