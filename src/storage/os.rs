//! OS Storage
//!
//! `Storage` backed by the real filesystem.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use super::{Storage, StorageEntry, StorageReader, StorageWriter};

/// Storage that calls straight into `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsStorage;

impl OsStorage {
    pub fn new() -> Self {
        OsStorage
    }
}

impl Storage for OsStorage {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn open_read(&self, path: &Path) -> io::Result<StorageReader> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_write(&self, path: &Path) -> io::Result<StorageWriter> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn list(&self, root: &Path) -> io::Result<Vec<StorageEntry>> {
        let mut entries = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let is_dir = entry.file_type()?.is_dir();
                let path = entry.path();
                if is_dir {
                    pending.push(path.clone());
                }
                entries.push(StorageEntry { path, is_dir });
            }
        }

        Ok(entries)
    }
}
