//! The file contract shared by every handle.
//!
//! Regular files and the root directory expose the same four operations.
//! Reading bytes from a directory fails with [`FsError::IsADirectory`] and
//! listing a regular file fails with [`FsError::NotADirectory`], so generic
//! consumers can treat any handle uniformly.

use crate::dir::{DirEntry, DirHandle};
use crate::error::{FsError, Result};
use crate::file::FileHandle;
use crate::types::Metadata;
use std::io;

/// Operations available on every open handle.
///
/// All methods take `&self`; implementations synchronize internally so a
/// handle can be shared between threads.
pub trait File: Send + Sync {
    /// Reads up to `buf.len()` bytes at the cursor and advances it.
    ///
    /// Returns `Ok(0)` once the content is exhausted, on every later call.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::Closed`] after `close`, and with
    /// [`FsError::IsADirectory`] on a directory.
    fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// Closes the handle. Closing twice is not an error.
    ///
    /// # Errors
    ///
    /// Fails only with [`FsError::Invalid`] on an absent handle.
    fn close(&self) -> Result<()>;

    /// Returns the handle's metadata.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::Closed`] after `close`.
    fn stat(&self) -> Result<Metadata>;

    /// Returns the next batch of directory entries.
    ///
    /// With `n > 0` at most `n` entries are returned; with `n <= 0` all
    /// remaining entries are. An exhausted listing yields an empty batch.
    ///
    /// # Errors
    ///
    /// Fails with [`FsError::NotADirectory`] on a regular file.
    fn read_dir(&self, n: isize) -> Result<Vec<DirEntry>>;
}

/// An absent handle: every operation fails with [`FsError::Invalid`].
impl<F: File> File for Option<F> {
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.as_ref().ok_or(FsError::Invalid)?.read(buf)
    }

    fn close(&self) -> Result<()> {
        self.as_ref().ok_or(FsError::Invalid)?.close()
    }

    fn stat(&self) -> Result<Metadata> {
        self.as_ref().ok_or(FsError::Invalid)?.stat()
    }

    fn read_dir(&self, n: isize) -> Result<Vec<DirEntry>> {
        self.as_ref().ok_or(FsError::Invalid)?.read_dir(n)
    }
}

/// A handle returned by [`GistFs::open`](crate::GistFs::open).
#[derive(Debug)]
pub enum Handle {
    /// A regular file
    File(FileHandle),
    /// The root directory
    Dir(DirHandle),
}

impl Handle {
    /// Returns `true` for the root directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Returns the file handle, if this is a regular file.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::File(file) => Some(file),
            Self::Dir(_) => None,
        }
    }

    /// Returns the directory handle, if this is the root.
    #[must_use]
    pub const fn as_dir(&self) -> Option<&DirHandle> {
        match self {
            Self::Dir(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    fn inner(&self) -> &dyn File {
        match self {
            Self::File(file) => file,
            Self::Dir(dir) => dir,
        }
    }
}

impl File for Handle {
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.inner().read(buf)
    }

    fn close(&self) -> Result<()> {
        self.inner().close()
    }

    fn stat(&self) -> Result<Metadata> {
        self.inner().stat()
    }

    fn read_dir(&self, n: isize) -> Result<Vec<DirEntry>> {
        self.inner().read_dir(n)
    }
}

impl io::Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(self, buf).map_err(io::Error::from)
    }
}
