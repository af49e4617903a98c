//! Error types for the gist filesystem.
//!
//! Every filesystem operation returns [`FsError`]. End-of-data conditions
//! (an exhausted reader, an exhausted directory listing) are never errors:
//! they are reported as a zero count or an empty batch.
//!
//! # Examples
//!
//! ```
//! use gistfs::FsError;
//!
//! let err = FsError::NotExist {
//!     path: "missing.txt".to_string(),
//! };
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "open missing.txt: file does not exist");
//! ```

use crate::fetch::BoxError;
use std::io;
use thiserror::Error;

/// Errors returned by the gist filesystem and its handles.
#[derive(Error, Debug)]
pub enum FsError {
    /// The filesystem was used before a successful [`load`](crate::GistFs::load).
    ///
    /// This is a refinement of the invalid-argument category:
    /// [`FsError::is_invalid`] is also `true` for it.
    #[error("gist not loaded: invalid argument")]
    NotLoaded,

    /// No blob matches the requested name.
    #[error("open {path}: file does not exist")]
    NotExist {
        /// The path that was requested
        path: String,
    },

    /// Operation invoked on an absent handle.
    #[error("invalid argument")]
    Invalid,

    /// Operation invoked on a handle after it was closed.
    #[error("read {path}: file already closed")]
    Closed {
        /// Name of the closed file
        path: String,
    },

    /// Directory iteration attempted on a regular file.
    #[error("read {path}: is not a directory")]
    NotADirectory {
        /// Name of the file
        path: String,
    },

    /// Byte read attempted on a directory.
    #[error("read {path}: is a directory")]
    IsADirectory {
        /// Name of the directory
        path: String,
    },

    /// The collection identifier cannot be used to address a gist.
    #[error("invalid gist id: {id:?}")]
    InvalidGistId {
        /// The rejected identifier
        id: String,
    },

    /// The fetch collaborator failed; its error is surfaced unchanged.
    #[error(transparent)]
    Fetch(BoxError),
}

impl FsError {
    /// Returns `true` if the filesystem has not been loaded yet.
    #[must_use]
    pub const fn is_not_loaded(&self) -> bool {
        matches!(self, Self::NotLoaded)
    }

    /// Returns `true` if the requested name does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use gistfs::FsError;
    ///
    /// let err = FsError::NotExist { path: "c.txt".to_string() };
    /// assert!(err.is_not_found());
    /// assert!(!err.is_invalid());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotExist { .. })
    }

    /// Returns `true` for the invalid-argument category.
    ///
    /// Covers absent handles, unusable gist ids, and the not-loaded state.
    ///
    /// # Examples
    ///
    /// ```
    /// use gistfs::FsError;
    ///
    /// assert!(FsError::Invalid.is_invalid());
    /// assert!(FsError::NotLoaded.is_invalid());
    /// ```
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(
            self,
            Self::Invalid | Self::NotLoaded | Self::InvalidGistId { .. }
        )
    }

    /// Returns `true` if the handle was already closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// Returns `true` if directory iteration was attempted on a file.
    #[must_use]
    pub const fn is_not_a_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` if a byte read was attempted on a directory.
    #[must_use]
    pub const fn is_a_directory(&self) -> bool {
        matches!(self, Self::IsADirectory { .. })
    }

    /// Returns `true` if the error came from the fetch collaborator.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Returns the path carried by the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NotExist { path }
            | Self::Closed { path }
            | Self::NotADirectory { path }
            | Self::IsADirectory { path } => Some(path),
            _ => None,
        }
    }

    /// Maps the error onto the closest [`io::ErrorKind`].
    #[must_use]
    pub const fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::NotLoaded | Self::Invalid | Self::InvalidGistId { .. } => {
                io::ErrorKind::InvalidInput
            }
            Self::NotExist { .. } => io::ErrorKind::NotFound,
            Self::NotADirectory { .. } => io::ErrorKind::NotADirectory,
            Self::IsADirectory { .. } => io::ErrorKind::IsADirectory,
            Self::Closed { .. } | Self::Fetch(_) => io::ErrorKind::Other,
        }
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        Self::new(err.io_kind(), err)
    }
}

/// Type alias for filesystem results.
pub type Result<T> = std::result::Result<T, FsError>;
