//! Fetch collaborator contract.
//!
//! The filesystem never talks to the network itself. It asks a
//! [`GistFetcher`] for the whole collection once per load and propagates the
//! fetcher's error unchanged.
//!
//! # Examples
//!
//! ```
//! use async_trait::async_trait;
//! use gistfs::{BoxError, Collection, GistFetcher, GistId};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug)]
//! struct Empty;
//!
//! #[async_trait]
//! impl GistFetcher for Empty {
//!     async fn fetch(
//!         &self,
//!         _id: &GistId,
//!         _cancel: &CancellationToken,
//!     ) -> Result<Collection, BoxError> {
//!         Ok(Collection::new(chrono::Utc::now()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::types::GistId;

/// Opaque error produced by a fetch collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw collection returned by a fetch: blob contents keyed by name plus the
/// collection's last-modified timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Blob contents keyed by name
    pub files: HashMap<String, Vec<u8>>,
    /// Last time the collection was modified
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            files: HashMap::new(),
            updated_at,
        }
    }

    /// Adds a blob, replacing any blob with the same name.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

/// Source of gist collections.
///
/// Implementations perform one blocking retrieval per call and must honour
/// `cancel`: once it fires, the fetch should give up and return an error.
#[async_trait]
pub trait GistFetcher: Send + Sync + fmt::Debug {
    /// Retrieves the complete collection identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error; the filesystem passes it through
    /// verbatim.
    async fn fetch(
        &self,
        id: &GistId,
        cancel: &CancellationToken,
    ) -> Result<Collection, BoxError>;
}

#[async_trait]
impl<F: GistFetcher + ?Sized> GistFetcher for Arc<F> {
    async fn fetch(
        &self,
        id: &GistId,
        cancel: &CancellationToken,
    ) -> Result<Collection, BoxError> {
        (**self).fetch(id, cancel).await
    }
}

/// Error returned by [`StaticFetcher`] when the load was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("fetch cancelled")]
pub struct Cancelled;

/// In-memory fetcher that serves a fixed collection regardless of the id.
///
/// Useful for tests and for mounting content that is already at hand.
///
/// # Examples
///
/// ```
/// use gistfs::{Collection, GistFs, GistId, StaticFetcher};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> gistfs::Result<()> {
/// let fetcher = StaticFetcher::new(Collection::new(chrono::Utc::now()).with_file("a.txt", "hi"));
/// let fs = GistFs::with_fetcher(fetcher, GistId::new("local")?);
/// fs.load(&CancellationToken::new()).await?;
/// assert_eq!(fs.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    collection: Collection,
}

impl StaticFetcher {
    /// Creates a fetcher that always returns `collection`.
    #[must_use]
    pub const fn new(collection: Collection) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl GistFetcher for StaticFetcher {
    async fn fetch(
        &self,
        _id: &GistId,
        cancel: &CancellationToken,
    ) -> Result<Collection, BoxError> {
        if cancel.is_cancelled() {
            return Err(Box::new(Cancelled));
        }
        Ok(self.collection.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher_returns_collection() {
        let collection = Collection::new(Utc::now()).with_file("a.txt", "hi");
        let fetcher = StaticFetcher::new(collection.clone());
        let id = GistId::new("any").unwrap();

        let fetched = fetcher.fetch(&id, &CancellationToken::new()).await.unwrap();
        assert_eq!(fetched, collection);
    }

    #[tokio::test]
    async fn test_static_fetcher_honours_cancel() {
        let fetcher = StaticFetcher::new(Collection::new(Utc::now()));
        let id = GistId::new("any").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fetcher.fetch(&id, &cancel).await.unwrap_err();
        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[test]
    fn test_with_file_replaces() {
        let collection = Collection::new(Utc::now())
            .with_file("a.txt", "one")
            .with_file("a.txt", "two");
        assert_eq!(collection.files.len(), 1);
        assert_eq!(collection.files["a.txt"], b"two");
    }
}
