//! Shared plumbing for commands that read a gist.
//!
//! Resolves GitHub settings from flags and the config file, builds the
//! filesystem, and runs the initial load with Ctrl-C wired to cancellation.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gistfs::{GistFs, GistId, GithubConfig, GithubFetcher, Metadata};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Connection options taken from global flags.
///
/// Every field overrides the config file when set.
#[derive(Debug, Clone, Default)]
pub struct GistOptions {
    /// Bearer token
    pub token: Option<String>,
    /// REST API base URL
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

impl GistOptions {
    /// Merges these options over `config` into a [`GithubConfig`].
    ///
    /// Empty token strings are treated as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use gistfs_cli::commands::common::GistOptions;
    /// use gistfs_cli::config::Config;
    /// use std::time::Duration;
    ///
    /// let options = GistOptions {
    ///     timeout: Some(5),
    ///     ..GistOptions::default()
    /// };
    /// let github = options.github_config(&Config::default());
    ///
    /// assert_eq!(github.api_url, "https://api.github.com");
    /// assert_eq!(github.timeout, Duration::from_secs(5));
    /// assert!(github.token.is_none());
    /// ```
    #[must_use]
    pub fn github_config(&self, config: &Config) -> GithubConfig {
        let api_url = self.api_url.as_deref().unwrap_or(&config.github.api_url);
        let timeout = self.timeout.unwrap_or(config.github.timeout_seconds);

        let github = GithubConfig::default()
            .with_api_url(api_url)
            .with_timeout(Duration::from_secs(timeout));

        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => github.with_token(token),
            None => github,
        }
    }
}

/// Serializable view of one filesystem entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryView {
    /// Base name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Mode rendered as `-r--r--r--`
    pub mode: String,
    /// Whether this is the root directory
    pub is_dir: bool,
    /// Modification time
    pub modified: DateTime<Utc>,
}

impl From<&Metadata> for EntryView {
    fn from(meta: &Metadata) -> Self {
        Self {
            name: meta.name().to_string(),
            size: meta.size(),
            mode: meta.mode().to_string(),
            is_dir: meta.is_dir(),
            modified: meta.modified(),
        }
    }
}

impl fmt::Display for EntryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>8} {} {}",
            self.mode,
            self.size,
            self.modified.format("%Y-%m-%d %H:%M"),
            self.name
        )
    }
}

/// A list of entries that renders one entry per line in text mode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Listing(pub Vec<EntryView>);

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Builds a GitHub-backed filesystem for `id` and loads it.
///
/// # Errors
///
/// Returns an error if the id is malformed, the HTTP client cannot be
/// built, or the load fails or is interrupted.
pub async fn open_gist(id: &str, options: &GistOptions, config: &Config) -> Result<GistFs> {
    let id = GistId::new(id)?;
    let github = options.github_config(config);
    debug!("Using GitHub API at {}", github.api_url);

    let fetcher = GithubFetcher::new(github).context("failed to create GitHub client")?;
    let fs = GistFs::with_fetcher(fetcher, id);

    load_interruptible(&fs).await?;
    Ok(fs)
}

/// Loads `fs`, cancelling the fetch if Ctrl-C arrives first.
///
/// # Errors
///
/// Returns the load error with the gist id as context.
pub async fn load_interruptible(fs: &GistFs) -> Result<()> {
    let cancel = CancellationToken::new();

    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling load");
                cancel.cancel();
            }
        })
    };

    let result = fs.load(&cancel).await;
    watcher.abort();

    result.with_context(|| format!("failed to load gist {}", fs.id()))?;
    debug!("Gist {} has {} files", fs.id(), fs.len());
    Ok(())
}
