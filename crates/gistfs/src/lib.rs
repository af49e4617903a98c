//! Read-only virtual filesystem over a GitHub Gist.
//!
//! A gist is a flat collection of named text blobs. This crate fetches the
//! collection once and exposes it through a small filesystem contract:
//! open-by-path, read bytes, stat metadata, and list the single synthetic
//! root directory.
//!
//! # Features
//!
//! - **Snapshot loading**: each [`GistFs::load`] swaps in a complete, immutable
//!   snapshot, so readers never see a half-applied load
//! - **Independent handles**: every open returns a handle with its own cursor
//!   and its own lock
//! - **Paginated listing**: [`DirHandle`] enumerates entries in chunks
//! - **Pluggable source**: any [`GistFetcher`] can back the filesystem; the
//!   `github` feature provides [`GithubFetcher`]
//!
//! # Examples
//!
//! ```
//! use gistfs::{Collection, File, GistFs, GistId, StaticFetcher};
//! use std::io::Read;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> gistfs::Result<()> {
//! let collection = Collection::new(chrono::Utc::now())
//!     .with_file("a.txt", "hi")
//!     .with_file("b.txt", "bye");
//!
//! let fs = GistFs::with_fetcher(StaticFetcher::new(collection), GistId::new("ded2f6727d98")?);
//! fs.load(&CancellationToken::new()).await?;
//!
//! assert_eq!(fs.read_file("a.txt")?, b"hi");
//!
//! let mut file = fs.open("b.txt")?;
//! let mut content = String::new();
//! file.read_to_string(&mut content).unwrap();
//! assert_eq!(content, "bye");
//!
//! let root = fs.open(".")?;
//! let entries = root.read_dir(-1)?;
//! assert_eq!(entries.len(), 2);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod dir;
pub mod error;
pub mod fetch;
pub mod file;
pub mod fs;
#[cfg(feature = "github")]
pub mod github;
pub mod handle;
pub mod types;

pub use dir::{DirEntry, DirHandle};
pub use error::{FsError, Result};
pub use fetch::{BoxError, Cancelled, Collection, GistFetcher, StaticFetcher};
pub use file::FileHandle;
pub use fs::GistFs;
#[cfg(feature = "github")]
pub use github::{GithubConfig, GithubError, GithubFetcher};
pub use handle::{File, Handle};
pub use types::{BlobRecord, FileMode, GistId, Metadata, ROOT_NAME};

// Re-exported so callers can drive `GistFs::load` without a direct dependency.
pub use tokio_util::sync::CancellationToken;
