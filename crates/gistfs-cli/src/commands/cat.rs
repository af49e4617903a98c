//! `cat` command: print gist files to stdout.

use super::common::{GistOptions, open_gist};
use crate::cli::ExitCode;
use crate::config::Config;
use anyhow::{Context, Result};
use gistfs::{File, GistFs};
use std::io::{self, Write};
use tracing::debug;

/// Streams each named file into `out`, in order.
///
/// Returns the total number of bytes written.
///
/// # Errors
///
/// Stops at the first name that cannot be opened or read; earlier files
/// have already been written.
pub fn write_files<W: Write>(fs: &GistFs, names: &[String], out: &mut W) -> Result<u64> {
    let mut total = 0;

    for name in names {
        let mut handle = fs.open(name).with_context(|| format!("cannot open {name}"))?;
        let copied = io::copy(&mut handle, out).with_context(|| format!("cannot read {name}"))?;
        handle.close()?;

        debug!("Wrote {copied} bytes from {name}");
        total += copied;
    }

    out.flush()?;
    Ok(total)
}

/// Runs the `cat` command.
///
/// # Errors
///
/// Returns an error if the gist cannot be loaded or a file cannot be read.
pub async fn run(
    gist_id: &str,
    names: &[String],
    options: &GistOptions,
    config: &Config,
) -> Result<ExitCode> {
    let fs = open_gist(gist_id, options, config).await?;
    let stdout = io::stdout();
    write_files(&fs, names, &mut stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}
