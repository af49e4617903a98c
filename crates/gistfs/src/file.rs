//! Handle to one opened blob.

use crate::dir::DirEntry;
use crate::error::{FsError, Result};
use crate::handle::File;
use crate::types::{BlobRecord, Metadata};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An open, read-only file.
///
/// Each handle owns its cursor; handles opened on the same name never share
/// state. All operations lock the handle, so concurrent calls on the same
/// handle observe atomic cursor and close transitions.
///
/// # Examples
///
/// ```
/// use gistfs::{File, FileHandle, BlobRecord};
/// use std::sync::Arc;
///
/// let record = Arc::new(BlobRecord::new("a.txt", "hello", chrono::Utc::now()));
/// let file = FileHandle::new(record);
///
/// let mut buf = [0u8; 3];
/// assert_eq!(file.read(&mut buf).unwrap(), 3);
/// assert_eq!(&buf, b"hel");
/// assert_eq!(file.read(&mut buf).unwrap(), 2);
/// assert_eq!(file.read(&mut buf).unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct FileHandle {
    name: String,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    // `None` once the handle is closed.
    record: Option<Arc<BlobRecord>>,
    cursor: usize,
}

impl FileHandle {
    /// Opens a handle on `record` with the cursor at 0.
    #[must_use]
    pub fn new(record: Arc<BlobRecord>) -> Self {
        Self {
            name: record.name().to_string(),
            state: Mutex::new(FileState {
                record: Some(record),
                cursor: 0,
            }),
        }
    }

    /// Returns the name of the blob this handle was opened on.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once [`close`](File::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().record.is_none()
    }

    /// Returns the current read offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.lock().cursor
    }

    fn lock(&self) -> MutexGuard<'_, FileState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed(&self) -> FsError {
        FsError::Closed {
            path: self.name.clone(),
        }
    }
}

impl File for FileHandle {
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        let cursor = state.cursor;
        let Some(record) = state.record.as_ref() else {
            return Err(self.closed());
        };

        let remaining = record.content().get(cursor..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        state.cursor += n;

        Ok(n)
    }

    fn close(&self) -> Result<()> {
        let mut state = self.lock();
        state.record = None;
        Ok(())
    }

    fn stat(&self) -> Result<Metadata> {
        let state = self.lock();
        state
            .record
            .as_ref()
            .map(Metadata::for_record)
            .ok_or_else(|| self.closed())
    }

    fn read_dir(&self, _n: isize) -> Result<Vec<DirEntry>> {
        Err(FsError::NotADirectory {
            path: self.name.clone(),
        })
    }
}

impl io::Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Read for &FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(*self, buf).map_err(io::Error::from)
    }
}
