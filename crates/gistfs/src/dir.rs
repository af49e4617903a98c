//! Handle to the synthetic root directory.
//!
//! A [`DirHandle`] owns a snapshot of entries taken when it was opened and
//! hands them out in contiguous batches. Reloading the filesystem never
//! disturbs an enumeration already in progress.

use crate::error::{FsError, Result};
use crate::file::FileHandle;
use crate::handle::File;
use crate::types::{BlobRecord, FileMode, Metadata, ROOT_NAME};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// One entry of a directory listing.
///
/// Entries double as open file handles: [`DirEntry::handle`] reads the
/// entry's content without going back to the filesystem root.
#[derive(Debug, Clone)]
pub struct DirEntry {
    info: Metadata,
    handle: Arc<FileHandle>,
}

impl DirEntry {
    pub(crate) fn new(record: &Arc<BlobRecord>) -> Self {
        Self {
            info: Metadata::for_record(record),
            handle: Arc::new(FileHandle::new(Arc::clone(record))),
        }
    }

    /// Returns the entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Returns `true` if the entry is a directory. Always `false` here.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.info.is_dir()
    }

    /// Returns the type bits of the entry's mode.
    #[must_use]
    pub const fn file_type(&self) -> FileMode {
        self.info.file_type()
    }

    /// Returns the entry's full metadata.
    #[must_use]
    pub fn info(&self) -> Metadata {
        self.info.clone()
    }

    /// Returns the open handle backing this entry.
    #[must_use]
    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }
}

/// An open handle on the root directory.
///
/// `read_dir` pages through the snapshot: each call returns the batch that
/// immediately follows the previous one, and the offset only moves forward.
///
/// # Examples
///
/// ```
/// use gistfs::{BlobRecord, DirHandle, File};
/// use std::sync::Arc;
///
/// let now = chrono::Utc::now();
/// let records = ["a.txt", "b.txt", "c.txt"]
///     .map(|name| Arc::new(BlobRecord::new(name, "", now)));
/// let dir = DirHandle::new(records.iter(), now);
///
/// assert_eq!(dir.read_dir(2).unwrap().len(), 2);
/// assert_eq!(dir.read_dir(2).unwrap().len(), 1);
/// assert!(dir.read_dir(2).unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct DirHandle {
    entries: Vec<DirEntry>,
    offset: Mutex<usize>,
    modified: DateTime<Utc>,
}

impl DirHandle {
    /// Creates a directory handle over `records`, keeping their order.
    #[must_use]
    pub fn new<'a>(
        records: impl IntoIterator<Item = &'a Arc<BlobRecord>>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            entries: records.into_iter().map(DirEntry::new).collect(),
            offset: Mutex::new(0),
            modified,
        }
    }

    /// Returns the total number of entries in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries not yet returned by `read_dir`.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries.len() - offset
    }
}

impl File for DirHandle {
    fn read(&self, _buf: &mut [u8]) -> Result<usize> {
        Err(FsError::IsADirectory {
            path: ROOT_NAME.to_string(),
        })
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn stat(&self) -> Result<Metadata> {
        Ok(Metadata::for_root(self.modified))
    }

    fn read_dir(&self, n: isize) -> Result<Vec<DirEntry>> {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        let remaining = self.entries.len() - *offset;

        let count = match usize::try_from(n) {
            Ok(n) if n > 0 => remaining.min(n),
            _ => remaining,
        };

        let batch = self.entries[*offset..*offset + count].to_vec();
        *offset += count;

        Ok(batch)
    }
}
