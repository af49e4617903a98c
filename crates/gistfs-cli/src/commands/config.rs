//! `config` command: create, show and locate the configuration file.

use crate::actions::ConfigAction;
use crate::cli::{ExitCode, OutputFormat};
use crate::config::{Config, config_path};
use crate::formatters::format_output;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Result of `config init`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub created: bool,
    /// Config file path
    pub path: String,
}

impl fmt::Display for InitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created {
            write!(f, "created {}", self.path)
        } else {
            write!(f, "{} already exists (use --force to overwrite)", self.path)
        }
    }
}

/// Result of `config show`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShowResult {
    /// Config file path
    pub path: String,
    /// Whether the file exists; defaults are shown otherwise
    pub exists: bool,
    /// Effective configuration
    pub config: Config,
}

impl fmt::Display for ShowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let toml = toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?;
        write!(f, "{}", toml.trim_end())
    }
}

/// Result of `config path`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathResult {
    /// Config file path
    pub path: String,
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Writes a default config file at `path` unless one exists and `force` is
/// unset.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn init_at(path: &Path, force: bool) -> Result<InitResult> {
    let created = force || !path.exists();
    if created {
        Config::default().save_to(path)?;
        info!("Wrote default config to {}", path.display());
    }

    Ok(InitResult {
        created,
        path: path.display().to_string(),
    })
}

/// Loads the effective configuration stored at `path`.
///
/// # Errors
///
/// Returns an error if an existing file is invalid.
pub fn show_at(path: &Path) -> Result<ShowResult> {
    Ok(ShowResult {
        path: path.display().to_string(),
        exists: path.exists(),
        config: Config::load_from(path)?,
    })
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined or the
/// operation fails.
pub fn run(action: &ConfigAction, output_format: OutputFormat) -> Result<ExitCode> {
    let path = config_path()?;

    let output = match action {
        ConfigAction::Init { force } => format_output(&init_at(&path, *force)?, output_format)?,
        ConfigAction::Show => format_output(&show_at(&path)?, output_format)?,
        ConfigAction::Path => format_output(
            &PathResult {
                path: path.display().to_string(),
            },
            output_format,
        )?,
    };

    println!("{output}");
    Ok(ExitCode::SUCCESS)
}
