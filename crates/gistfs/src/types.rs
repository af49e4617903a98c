//! Core types for the gist filesystem.
//!
//! This module defines the strong types shared by the filesystem root and its
//! handles: the collection identifier, blob records, permission bits, and
//! file metadata.
//!
//! # Examples
//!
//! ```
//! use gistfs::{FileMode, GistId};
//!
//! let id = GistId::new("ded2f6727d98e6b0095e62a7813aa7cf").unwrap();
//! assert_eq!(id.as_str(), "ded2f6727d98e6b0095e62a7813aa7cf");
//!
//! assert_eq!(FileMode::FILE.to_string(), "-r--r--r--");
//! assert_eq!(FileMode::ROOT.to_string(), "dr--r--r--");
//! ```

use crate::error::{FsError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Name reported by the root directory's metadata.
pub const ROOT_NAME: &str = "./";

/// Path literals that denote the root directory.
pub(crate) const ROOT_PATHS: [&str; 2] = [".", "/"];

/// Returns `true` if `path` denotes the synthetic root directory.
pub(crate) fn is_root(path: &str) -> bool {
    ROOT_PATHS.contains(&path)
}

/// Identifier of a remote gist.
///
/// Only ASCII alphanumerics, `-` and `_` are accepted, which keeps the id
/// safe to place in a URL path segment.
///
/// # Examples
///
/// ```
/// use gistfs::GistId;
///
/// assert!(GistId::new("ded2f6727d98").is_ok());
/// assert!(GistId::new("").is_err());
/// assert!(GistId::new("../users").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GistId(String);

impl GistId {
    /// Creates a validated gist identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidGistId`] if the id is empty or contains a
    /// character outside `[A-Za-z0-9_-]`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if valid {
            Ok(Self(id))
        } else {
            Err(FsError::InvalidGistId { id })
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GistId {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for GistId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One named blob of a loaded gist.
///
/// Records are created in bulk by [`GistFs::load`](crate::GistFs::load) and
/// never mutated afterwards. `modified` is the gist's last-update time, shared
/// by every record of the same load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    name: String,
    content: Vec<u8>,
    modified: DateTime<Utc>,
}

impl BlobRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            modified,
        }
    }

    /// Returns the blob name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the blob content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Returns the gist's last-modified time.
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

/// File type and permission bits.
///
/// The layout follows the Unix convention: the low nine bits are permissions,
/// the high bit flags a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileMode(u32);

impl FileMode {
    /// Directory flag.
    pub const DIR: Self = Self(1 << 31);

    /// Mask of the permission bits.
    pub const PERM: Self = Self(0o777);

    /// Read-only permissions for owner, group and others.
    pub const READ_ONLY: Self = Self(0o444);

    /// Mode of every blob: a regular read-only file.
    pub const FILE: Self = Self::READ_ONLY;

    /// Mode of the root directory.
    pub const ROOT: Self = Self(Self::DIR.0 | Self::READ_ONLY.0);

    /// Creates a mode from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if the directory flag is set.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        self.0 & Self::DIR.0 != 0
    }

    /// Returns `true` if no type bits are set.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        self.0 & !Self::PERM.0 == 0
    }

    /// Returns the permission bits only.
    #[must_use]
    pub const fn permissions(self) -> u32 {
        self.0 & Self::PERM.0
    }

    /// Returns the type bits only.
    #[must_use]
    pub const fn file_type(self) -> Self {
        Self(self.0 & !Self::PERM.0)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RWX: &[u8; 9] = b"rwxrwxrwx";

        let mut out = String::with_capacity(10);
        out.push(if self.is_dir() { 'd' } else { '-' });
        for (i, c) in RWX.iter().enumerate() {
            if self.0 & (1 << (8 - i)) != 0 {
                out.push(char::from(*c));
            } else {
                out.push('-');
            }
        }
        f.write_str(&out)
    }
}

/// Metadata describing a file or the root directory.
#[derive(Debug, Clone)]
pub struct Metadata {
    name: String,
    size: u64,
    mode: FileMode,
    modified: DateTime<Utc>,
    sys: Option<Arc<BlobRecord>>,
}

impl Metadata {
    pub(crate) fn for_record(record: &Arc<BlobRecord>) -> Self {
        Self {
            name: record.name().to_string(),
            size: record.size(),
            mode: FileMode::FILE,
            modified: record.modified(),
            sys: Some(Arc::clone(record)),
        }
    }

    pub(crate) fn for_root(modified: DateTime<Utc>) -> Self {
        Self {
            name: ROOT_NAME.to_string(),
            size: 0,
            mode: FileMode::ROOT,
            modified,
            sys: None,
        }
    }

    /// Returns the base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the content length in bytes; 0 for the root.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the mode bits.
    #[must_use]
    pub const fn mode(&self) -> FileMode {
        self.mode
    }

    /// Returns the type bits of the mode.
    #[must_use]
    pub const fn file_type(&self) -> FileMode {
        self.mode.file_type()
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Returns `true` for the root directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Returns the record backing a file, or `None` for the root.
    #[must_use]
    pub fn sys(&self) -> Option<&BlobRecord> {
        self.sys.as_deref()
    }
}
