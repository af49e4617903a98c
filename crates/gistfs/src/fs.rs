//! The filesystem root.
//!
//! [`GistFs`] binds a gist id to a fetch collaborator and holds the most
//! recently loaded snapshot. Each load builds a brand-new immutable snapshot
//! and swaps it in under a write lock. Loads are serialized end to end, so
//! the last load to start is the last one applied. Readers clone the current snapshot
//! under a read lock and release the lock before building their result, so
//! no handle depends on the lock after it is returned.
//!
//! # Examples
//!
//! ```
//! use gistfs::{Collection, GistFs, GistId, StaticFetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> gistfs::Result<()> {
//! let collection = Collection::new(chrono::Utc::now())
//!     .with_file("a.txt", "hi")
//!     .with_file("b.txt", "bye");
//! let fs = GistFs::with_fetcher(StaticFetcher::new(collection), GistId::new("ded2f6727d98")?);
//!
//! assert!(fs.read_file("a.txt").unwrap_err().is_not_loaded());
//!
//! fs.load(&CancellationToken::new()).await?;
//!
//! let names: Vec<_> = fs.read_dir(".")?.iter().map(|m| m.name().to_string()).collect();
//! assert_eq!(names, ["a.txt", "b.txt"]);
//! assert_eq!(fs.read_file("a.txt")?, b"hi");
//! assert!(fs.open("c.txt").unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```

use crate::dir::DirHandle;
use crate::error::{FsError, Result};
use crate::fetch::{Collection, GistFetcher};
use crate::file::FileHandle;
use crate::handle::Handle;
use crate::types::{BlobRecord, GistId, Metadata, is_root};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One loaded generation of the gist.
#[derive(Debug)]
struct Snapshot {
    // Name order gives every listing of one snapshot the same stable order.
    records: BTreeMap<String, Arc<BlobRecord>>,
    modified: DateTime<Utc>,
}

impl Snapshot {
    fn from_collection(collection: Collection) -> Self {
        let modified = collection.updated_at;
        let records = collection
            .files
            .into_iter()
            .map(|(name, content)| {
                let record = Arc::new(BlobRecord::new(name.clone(), content, modified));
                (name, record)
            })
            .collect();

        Self { records, modified }
    }

    fn get(&self, path: &str) -> Result<&Arc<BlobRecord>> {
        self.records.get(path).ok_or_else(|| FsError::NotExist {
            path: path.to_string(),
        })
    }

    fn open_root(&self) -> DirHandle {
        DirHandle::new(self.records.values(), self.modified)
    }
}

/// Read-only filesystem over one gist.
///
/// The filesystem is empty ("not loaded") until [`load`](Self::load)
/// succeeds. Every read operation before that fails with
/// [`FsError::NotLoaded`]. `"."` and `"/"` name the root directory; every
/// other path is matched exactly against blob names.
///
/// # Thread Safety
///
/// `GistFs` is `Send + Sync`. Loads and reads may run concurrently from any
/// number of threads or tasks; a reader sees either the previous snapshot
/// or the new one, never a mix. Concurrent loads run one at a time in
/// arrival order; readers never wait on a fetch.
pub struct GistFs {
    id: GistId,
    fetcher: Arc<dyn GistFetcher>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    // Held across fetch and swap.
    load_lock: Mutex<()>,
}

impl GistFs {
    /// Creates a filesystem for `id` backed by the public GitHub API.
    ///
    /// Uses [`GithubConfig::default`](crate::GithubConfig::default), which
    /// makes unauthenticated requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[cfg(feature = "github")]
    pub fn new(id: GistId) -> Result<Self> {
        let fetcher = crate::github::GithubFetcher::new(crate::github::GithubConfig::default())
            .map_err(|e| FsError::Fetch(Box::new(e)))?;
        Ok(Self::with_fetcher(fetcher, id))
    }

    /// Creates a filesystem for `id` backed by `fetcher`.
    #[must_use]
    pub fn with_fetcher(fetcher: impl GistFetcher + 'static, id: GistId) -> Self {
        Self {
            id,
            fetcher: Arc::new(fetcher),
            snapshot: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Returns the gist id this filesystem was created with.
    #[must_use]
    pub const fn id(&self) -> &GistId {
        &self.id
    }

    /// Returns `true` once a load has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Returns the gist's last-modified time, or `None` before the first load.
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.current().map(|snapshot| snapshot.modified)
    }

    /// Returns the number of files in the current snapshot (0 before load).
    #[must_use]
    pub fn len(&self) -> usize {
        self.current().map_or(0, |snapshot| snapshot.records.len())
    }

    /// Returns `true` if the current snapshot has no files or nothing is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches the gist and replaces the current snapshot.
    ///
    /// `cancel` is forwarded unchanged to the fetcher. On failure the
    /// previous snapshot, if any, stays in place. A load that starts while
    /// another is in flight waits for it to finish first.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Fetch`] wrapping the fetcher's error verbatim.
    pub async fn load(&self, cancel: &CancellationToken) -> Result<()> {
        let _guard = self.load_lock.lock().await;
        info!("Loading gist: {}", self.id);

        let collection = self
            .fetcher
            .fetch(&self.id, cancel)
            .await
            .map_err(FsError::Fetch)?;

        let snapshot = Arc::new(Snapshot::from_collection(collection));
        let count = snapshot.records.len();

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);

        info!("Loaded gist {} ({} files)", self.id, count);
        Ok(())
    }

    /// Opens the root directory or a named file.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotLoaded`] before the first load and
    /// [`FsError::NotExist`] for an unknown name.
    pub fn open(&self, path: &str) -> Result<Handle> {
        debug!("Opening {path:?} in gist {}", self.id);
        let snapshot = self.loaded()?;

        if is_root(path) {
            return Ok(Handle::Dir(snapshot.open_root()));
        }

        let record = snapshot.get(path)?;
        Ok(Handle::File(FileHandle::new(Arc::clone(record))))
    }

    /// Returns the content of a named file without opening a handle.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotLoaded`] before the first load and
    /// [`FsError::NotExist`] for an unknown name (including the root).
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        debug!("Reading {path:?} in gist {}", self.id);
        let snapshot = self.loaded()?;
        Ok(snapshot.get(path)?.content().to_vec())
    }

    /// Lists the root directory.
    ///
    /// Entries come back in the same order a freshly opened root
    /// [`DirHandle`] would enumerate them.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotLoaded`] before the first load,
    /// [`FsError::NotADirectory`] when `path` names a file, and
    /// [`FsError::NotExist`] for any other path.
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>> {
        debug!("Listing {path:?} in gist {}", self.id);
        let snapshot = self.loaded()?;

        if !is_root(path) {
            snapshot.get(path)?;
            return Err(FsError::NotADirectory {
                path: path.to_string(),
            });
        }

        Ok(snapshot.records.values().map(Metadata::for_record).collect())
    }

    /// Returns metadata for the root or a named file without opening a handle.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        debug!("Stat {path:?} in gist {}", self.id);
        let snapshot = self.loaded()?;

        if is_root(path) {
            return Ok(Metadata::for_root(snapshot.modified));
        }

        snapshot.get(path).map(Metadata::for_record)
    }

    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn loaded(&self) -> Result<Arc<Snapshot>> {
        self.current().ok_or(FsError::NotLoaded)
    }
}

impl fmt::Debug for GistFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistFs")
            .field("id", &self.id)
            .field("fetcher", &self.fetcher)
            .field("loaded", &self.is_loaded())
            .field("files", &self.len())
            .finish()
    }
}
