//! `export` command: copy every gist file into a local directory.
//!
//! Each file is written to a temporary file in the target directory and then
//! renamed into place, so a reader of the directory never observes a partial
//! file.

use super::common::{GistOptions, open_gist};
use crate::cli::{ExitCode, OutputFormat};
use crate::config::Config;
use crate::formatters::format_output;
use anyhow::{Context, Result, bail};
use gistfs::GistFs;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::{Component, Path};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// What an export did.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ExportReport {
    /// Target directory
    pub directory: String,
    /// Files written, in name order
    pub written: Vec<String>,
    /// Files left untouched, in name order
    pub skipped: Vec<String>,
    /// Total bytes written
    pub bytes: u64,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exported {} files ({} bytes) to {}",
            self.written.len(),
            self.bytes,
            self.directory
        )?;
        if !self.skipped.is_empty() {
            write!(f, ", skipped {}", self.skipped.join(", "))?;
        }
        Ok(())
    }
}

/// Returns `true` if `name` is a single normal path component.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Writes every file of `fs` into `dir`.
///
/// With `overwrite` unset, files that already exist are skipped, including
/// ones that appear while the export runs. Names that are not plain file
/// names are always skipped.
///
/// # Errors
///
/// Returns an error if `dir` is not an existing directory or a write fails.
pub fn export(fs: &GistFs, dir: &Path, overwrite: bool) -> Result<ExportReport> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut report = ExportReport {
        directory: dir.display().to_string(),
        ..ExportReport::default()
    };

    for meta in fs.read_dir(".")? {
        let name = meta.name();

        if !is_plain_file_name(name) {
            warn!("Skipping {name}: not a plain file name");
            report.skipped.push(name.to_string());
            continue;
        }

        let target = dir.join(name);
        if !overwrite && target.exists() {
            debug!("Skipping existing {}", target.display());
            report.skipped.push(name.to_string());
            continue;
        }

        let content = fs.read_file(name)?;
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        temp.write_all(&content)
            .with_context(|| format!("failed to write {name}"))?;

        let persisted = if overwrite {
            temp.persist(&target)
        } else {
            temp.persist_noclobber(&target)
        };

        match persisted {
            Ok(_) => {
                report.written.push(name.to_string());
                report.bytes += meta.size();
            }
            Err(e) if !overwrite && e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("Skipping {}: created during export", target.display());
                report.skipped.push(name.to_string());
            }
            Err(e) => {
                return Err(e.error)
                    .with_context(|| format!("failed to write {}", target.display()));
            }
        }
    }

    info!(
        "Exported {} files to {}",
        report.written.len(),
        report.directory
    );
    Ok(report)
}

/// Runs the `export` command.
///
/// # Errors
///
/// Returns an error if the gist cannot be loaded or a file cannot be written.
pub async fn run(
    gist_id: &str,
    dir: &Path,
    overwrite: bool,
    options: &GistOptions,
    config: &Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let fs = open_gist(gist_id, options, config).await?;
    let report = export(&fs, dir, overwrite)?;
    println!("{}", format_output(&report, output_format)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::test_support::loaded_fs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("a.txt"));
        assert!(is_plain_file_name(".hidden"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b"));
        assert!(!is_plain_file_name("/etc"));
        assert!(!is_plain_file_name("a\\b"));
    }

    #[tokio::test]
    async fn test_export_writes_all_files() {
        let fs = loaded_fs(&[("a.txt", "hi"), ("b.txt", "bye"), ("empty", "")]).await;
        let dir = TempDir::new().unwrap();

        let report = export(&fs, dir.path(), true).unwrap();

        assert_eq!(report.written, ["a.txt", "b.txt", "empty"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.bytes, 5);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"hi");
        assert_eq!(fs::read(dir.path().join("b.txt")).unwrap(), b"bye");
        assert_eq!(fs::read(dir.path().join("empty")).unwrap(), b"");
    }

    #[tokio::test]
    async fn test_export_leaves_no_temp_files() {
        let fs = loaded_fs(&[("a.txt", "hi"), ("b.txt", "bye")]).await;
        let dir = TempDir::new().unwrap();

        export(&fs, dir.path(), true).unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_export_overwrites_existing() {
        let fs = loaded_fs(&[("a.txt", "new")]).await;
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "old").unwrap();

        let report = export(&fs, dir.path(), true).unwrap();

        assert_eq!(report.written, ["a.txt"]);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_export_no_overwrite_skips_existing() {
        let fs = loaded_fs(&[("a.txt", "new"), ("b.txt", "bye")]).await;
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "old").unwrap();

        let report = export(&fs, dir.path(), false).unwrap();

        assert_eq!(report.written, ["b.txt"]);
        assert_eq!(report.skipped, ["a.txt"]);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"old");
        assert!(report.to_string().ends_with("skipped a.txt"));
    }

    #[tokio::test]
    async fn test_export_requires_directory() {
        let fs = loaded_fs(&[("a.txt", "hi")]).await;
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing");
        assert!(export(&fs, &missing, true).is_err());

        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();
        assert!(export(&fs, &file, true).is_err());
    }

    #[tokio::test]
    async fn test_export_report_display() {
        let fs = loaded_fs(&[("a.txt", "hi")]).await;
        let dir = TempDir::new().unwrap();

        let report = export(&fs, dir.path(), true).unwrap();
        assert_eq!(
            report.to_string(),
            format!("exported 1 files (2 bytes) to {}", dir.path().display())
        );
    }
}
