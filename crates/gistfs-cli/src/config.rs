//! CLI configuration file.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/gistfs/config.toml`
//! - macOS: `~/Library/Application Support/gistfs/config.toml`
//! - Windows: `%APPDATA%\gistfs\config.toml`
//!
//! Command-line flags and their environment fallbacks always win over the
//! file. The token is never stored here; pass it with `--token` or
//! `GITHUB_TOKEN`.

use crate::cli::OutputFormat;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound for `github.timeout_seconds`.
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// CLI configuration.
///
/// # Examples
///
/// ```toml
/// [github]
/// api_url = "https://api.github.com"
/// timeout_seconds = 30
///
/// [output]
/// default_format = "pretty"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// GitHub API settings
    #[serde(default)]
    pub github: GithubSection,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubSection {
    /// Base URL of the REST API
    pub api_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSection {
    /// Default output format (json, text, pretty)
    pub default_format: String,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            api_url: gistfs::github::DEFAULT_API_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default().to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or malformed.
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;

        let url = &self.github.api_url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            bail!("invalid github.api_url '{url}', must start with http:// or https://");
        }

        if self.github.timeout_seconds == 0 {
            bail!("github.timeout_seconds must be greater than 0");
        }

        if self.github.timeout_seconds > MAX_TIMEOUT_SECONDS {
            bail!("github.timeout_seconds cannot exceed {MAX_TIMEOUT_SECONDS} seconds");
        }

        Ok(())
    }

    /// Returns the configured default output format.
    ///
    /// # Errors
    ///
    /// Returns an error if `output.default_format` is not a known format.
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output
            .default_format
            .parse()
            .context("invalid output.default_format")
    }

    /// Loads and validates configuration from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Validates and writes the configuration to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, serialization or I/O fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }

        let toml_str = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, toml_str).context("failed to write config file")?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
///
/// # Errors
///
/// Returns an error if the platform config directory cannot be determined.
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;
    Ok(config_dir.join("gistfs").join("config.toml"))
}
