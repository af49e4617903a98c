//! CLI-specific types.
//!
//! Strong types for output selection and process exit status, shared by every
//! command.
//!
//! # Examples
//!
//! ```
//! use gistfs_cli::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
//! ```

use clap::ValueEnum;
use gistfs::FsError;
use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Pretty-printed output with colors for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    ///
    /// # Examples
    ///
    /// ```
    /// use gistfs_cli::cli::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Json.as_str(), "json");
    /// assert_eq!(OutputFormat::Text.as_str(), "text");
    /// assert_eq!(OutputFormat::Pretty.as_str(), "pretty");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown output format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid output format: '{0}' (expected: json, text, or pretty)")]
pub struct ParseFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

/// CLI exit code with semantic meaning.
///
/// Success is 0; failures are non-zero and distinguish bad input, missing
/// files and remote failures so scripts can branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// A named file does not exist in the gist (exit code 3).
    pub const NOT_FOUND: Self = Self(3);

    /// The gist could not be fetched (exit code 4).
    pub const FETCH_ERROR: Self = Self(4);

    /// Interrupted by Ctrl-C (exit code 130).
    pub const INTERRUPTED: Self = Self(130);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Picks the exit code for a failed command.
    ///
    /// Looks for an [`FsError`] anywhere in the error chain and falls back
    /// to [`ExitCode::ERROR`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gistfs::FsError;
    /// use gistfs_cli::cli::ExitCode;
    ///
    /// let err = anyhow::Error::new(FsError::NotExist { path: "a.txt".into() });
    /// assert_eq!(ExitCode::for_error(&err), ExitCode::NOT_FOUND);
    ///
    /// assert_eq!(ExitCode::for_error(&anyhow::anyhow!("boom")), ExitCode::ERROR);
    /// ```
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let Some(fs_err) = err.chain().find_map(|e| e.downcast_ref::<FsError>()) else {
            return Self::ERROR;
        };

        match fs_err {
            FsError::NotExist { .. } => Self::NOT_FOUND,
            FsError::InvalidGistId { .. } => Self::INVALID_INPUT,
            FsError::Fetch(source) if is_cancellation(source.as_ref()) => Self::INTERRUPTED,
            FsError::Fetch(_) => Self::FETCH_ERROR,
            _ => Self::ERROR,
        }
    }
}

fn is_cancellation(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    err.is::<gistfs::Cancelled>()
        || err
            .downcast_ref::<gistfs::GithubError>()
            .is_some_and(gistfs::GithubError::is_cancelled)
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
