//! Memory Storage
//!
//! Deterministic in-memory `Storage` used by tests and benchmarks.
//!
//! Clones share the same tree, so a test can keep a handle to inspect the
//! bytes a table wrote.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Storage, StorageEntry, StorageReader, StorageWriter};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

impl Node {
    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir)
    }
}

type Tree = BTreeMap<PathBuf, Node>;

/// In-memory directory tree
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bytes of a file, if it exists
    pub fn file_contents(&self, path: &Path) -> Option<Vec<u8>> {
        match self.tree.lock().get(&normalize(path)) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// Overwrite a file directly, bypassing the writer (for corruption tests)
    pub fn set_file_contents(&self, path: &Path, data: Vec<u8>) {
        self.tree.lock().insert(normalize(path), Node::File(data));
    }

    /// Check if a directory exists
    pub fn is_dir(&self, path: &Path) -> bool {
        self.tree.lock().get(&normalize(path)).is_some_and(Node::is_dir)
    }
}

impl Storage for MemoryStorage {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree.lock();

        // Shallowest ancestor first, so parents always exist before children
        let ancestors: Vec<&Path> = path.ancestors().filter(|p| !is_top(p)).collect();
        for dir in ancestors.into_iter().rev() {
            match tree.get(dir).map(Node::is_dir) {
                Some(true) => {}
                Some(false) => return Err(not_a_directory(dir)),
                None => {
                    tree.insert(dir.to_path_buf(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        self.tree.lock().retain(|p, _| !p.starts_with(&path));
        Ok(())
    }

    fn open_read(&self, path: &Path) -> io::Result<StorageReader> {
        let path = normalize(path);
        match self.tree.lock().get(&path) {
            Some(Node::File(data)) => Ok(Box::new(Cursor::new(data.clone()))),
            Some(Node::Dir) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn create_write(&self, path: &Path) -> io::Result<StorageWriter> {
        let path = normalize(path);
        let mut tree = self.tree.lock();

        if let Some(parent) = path.parent().filter(|p| !is_top(p)) {
            match tree.get(parent).map(Node::is_dir) {
                Some(true) => {}
                Some(false) => return Err(not_a_directory(parent)),
                None => return Err(not_found(parent)),
            }
        }
        if tree.get(&path).is_some_and(Node::is_dir) {
            return Err(is_a_directory(&path));
        }

        tree.insert(path.clone(), Node::File(Vec::new()));
        Ok(Box::new(MemoryWriter {
            tree: Arc::clone(&self.tree),
            path,
        }))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree.lock();
        match tree.get(&path).map(Node::is_dir) {
            Some(false) => {
                tree.remove(&path);
                Ok(())
            }
            Some(true) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn list(&self, root: &Path) -> io::Result<Vec<StorageEntry>> {
        let root = normalize(root);
        let tree = self.tree.lock();

        if !is_top(&root) && !tree.get(&root).is_some_and(Node::is_dir) {
            return Err(not_found(&root));
        }

        Ok(tree
            .iter()
            .filter(|(p, _)| p.starts_with(&root) && **p != root)
            .map(|(p, node)| StorageEntry {
                path: p.clone(),
                is_dir: node.is_dir(),
            })
            .collect())
    }
}

/// Appends straight into the shared tree on every write
struct MemoryWriter {
    tree: Arc<Mutex<Tree>>,
    path: PathBuf,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.tree.lock().get_mut(&self.path) {
            Some(Node::File(data)) => {
                data.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(not_found(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Drop `.` components and trailing separators so equal paths compare equal
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// The filesystem root or the empty relative path; always present
fn is_top(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none()
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("{}: not a directory", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("{}: is a directory", path.display()),
    )
}
