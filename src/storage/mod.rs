//! Storage Module
//!
//! The filesystem capability a table runs on.
//!
//! ## Responsibilities
//! - Create and remove directories
//! - Open files for reading, create (truncate) files for writing
//! - Remove single files
//! - Enumerate everything under a directory
//!
//! ## Implementations
//! - `OsStorage`: thin adapter over `std::fs`
//! - `MemoryStorage`: deterministic in-memory tree for tests
//!
//! Missing files are reported as `io::ErrorKind::NotFound`; the table maps
//! that kind to `FileTableError::NotFound`.

mod memory;
mod os;

use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub use memory::MemoryStorage;
pub use os::OsStorage;

/// Reader handed out by `Storage::open_read`
pub type StorageReader = Box<dyn Read + Send>;

/// Writer handed out by `Storage::create_write`
pub type StorageWriter = Box<dyn Write + Send>;

/// One entry found by `Storage::list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Filesystem operations consumed by a table
///
/// Implementations must be shareable across threads: snapshot and key
/// streams read through the storage from a producer thread.
pub trait Storage: fmt::Debug + Send + Sync {
    /// Create `path` and any missing parents; no-op if it exists
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Remove `path` and everything under it; no-op if it is absent
    fn remove_tree(&self, path: &Path) -> io::Result<()>;

    /// Open an existing file for sequential reading
    fn open_read(&self, path: &Path) -> io::Result<StorageReader>;

    /// Create a file, truncating any previous content
    fn create_write(&self, path: &Path) -> io::Result<StorageWriter>;

    /// Remove a single file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Every file and directory below `root`, recursively, excluding `root`
    fn list(&self, root: &Path) -> io::Result<Vec<StorageEntry>>;
}
