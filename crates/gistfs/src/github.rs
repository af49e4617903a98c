//! GitHub Gist fetcher.
//!
//! Retrieves a gist through the GitHub REST API (`GET /gists/{id}`) and turns
//! it into a [`Collection`]. Files that the API reports as truncated are
//! completed by downloading their raw URL.
//!
//! # Examples
//!
//! ```no_run
//! use gistfs::{GistFs, GistId, GithubConfig, GithubFetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GithubConfig::from_env().with_user_agent("my-tool/1.0");
//! let fetcher = GithubFetcher::new(config)?;
//! let fs = GistFs::with_fetcher(fetcher, GistId::new("ded2f6727d98e6b0095e62a7813aa7cf")?);
//!
//! fs.load(&CancellationToken::new()).await?;
//! println!("{}", String::from_utf8_lossy(&fs.read_file("test1.txt")?));
//! # Ok(())
//! # }
//! ```

use crate::fetch::{BoxError, Collection, GistFetcher};
use crate::types::GistId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding a GitHub token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "GISTFS_API_URL";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Errors raised by [`GithubFetcher`].
#[derive(Error, Debug)]
pub enum GithubError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("GitHub request failed: {message}")]
    Http {
        /// What was being attempted
        message: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("GitHub API returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: StatusCode,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body is not a valid gist document.
    #[error("failed to decode gist response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The configured token is not a valid header value.
    #[error("GitHub token contains invalid characters")]
    InvalidToken,

    /// The load was cancelled before the fetch completed.
    #[error("gist fetch cancelled")]
    Cancelled,
}

impl GithubError {
    /// Returns `true` if the gist does not exist (HTTP 404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Returns `true` if the fetch was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Configuration for [`GithubFetcher`].
///
/// # Examples
///
/// ```
/// use gistfs::GithubConfig;
/// use std::time::Duration;
///
/// let config = GithubConfig::default()
///     .with_api_url("https://github.example.com/api/v3")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.api_url, "https://github.example.com/api/v3");
/// assert!(config.token.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Base URL of the REST API, without a trailing slash.
    ///
    /// Default: `https://api.github.com`
    pub api_url: String,

    /// Optional token sent as a bearer credential.
    ///
    /// Unauthenticated requests work for public gists but are rate limited.
    /// Default: None
    pub token: Option<SecretString>,

    /// `User-Agent` header; GitHub rejects requests without one.
    ///
    /// Default: `gistfs/<crate version>`
    pub user_agent: String,

    /// Total timeout for each HTTP request.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: concat!("gistfs/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GithubConfig {
    /// Builds a configuration from `GITHUB_TOKEN` and `GISTFS_API_URL`,
    /// falling back to defaults for anything unset or empty.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty()) {
            config = config.with_api_url(url);
        }
        if let Some(token) = std::env::var(TOKEN_ENV).ok().filter(|v| !v.is_empty()) {
            config = config.with_token(token);
        }

        config
    }

    /// Sets the API base URL. A trailing `/` is stripped.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the URL of the gist with the given id.
    #[must_use]
    pub fn gist_url(&self, id: &GistId) -> String {
        format!("{}/gists/{}", self.api_url, id)
    }
}

/// Gist document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct GistResponse {
    /// Gist id
    pub id: String,
    /// Last update time, shared by every file
    pub updated_at: DateTime<Utc>,
    /// Files keyed by name
    #[serde(default)]
    pub files: HashMap<String, GistFileResponse>,
}

/// One file of a [`GistResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct GistFileResponse {
    /// File name
    pub filename: Option<String>,
    /// Size reported by GitHub, in bytes
    #[serde(default)]
    pub size: u64,
    /// URL of the untruncated content
    pub raw_url: Option<String>,
    /// `true` when `content` was cut short by the API
    #[serde(default)]
    pub truncated: bool,
    /// Inline content
    #[serde(default)]
    pub content: Option<String>,
}

/// Fetches gists from the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubFetcher {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubFetcher {
    /// Creates a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidToken`] if the token cannot be used as a
    /// header value, or [`GithubError::Http`] if the client cannot be built.
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| GithubError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GithubError::Http {
                message: "failed to build HTTP client".to_string(),
                source: e,
            })?;

        Ok(Self { client, config })
    }

    /// Returns the fetcher configuration.
    #[must_use]
    pub const fn config(&self) -> &GithubConfig {
        &self.config
    }

    async fn get_gist(&self, id: &GistId) -> Result<Collection, GithubError> {
        let url = self.config.gist_url(id);
        debug!("Fetching gist from {url}");

        let response = self.send(&url).await?;
        let gist: GistResponse = response.json().await.map_err(GithubError::Decode)?;

        let mut collection = Collection::new(gist.updated_at);
        for (name, file) in gist.files {
            let content = match (file.truncated, file.raw_url) {
                (true, Some(raw_url)) => {
                    warn!("Gist file {name} is truncated, fetching {raw_url}");
                    self.get_raw(&raw_url).await?
                }
                _ => file.content.unwrap_or_default().into_bytes(),
            };
            collection.files.insert(name, content);
        }

        Ok(collection)
    }

    async fn get_raw(&self, url: &str) -> Result<Vec<u8>, GithubError> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|e| GithubError::Http {
            message: format!("failed to read {url}"),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, GithubError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GithubError::Http {
                message: format!("failed to GET {url}"),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl GistFetcher for GithubFetcher {
    async fn fetch(
        &self,
        id: &GistId,
        cancel: &CancellationToken,
    ) -> Result<Collection, BoxError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Box::new(GithubError::Cancelled)),
            result = self.get_gist(id) => result.map_err(|e| Box::new(e) as BoxError),
        }
    }
}
