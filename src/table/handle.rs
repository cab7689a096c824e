//! Table
//!
//! The public engine: one file per key under a base directory.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::MutexGuard;
use tracing::{debug, trace, warn};

use crate::codec::{decode_key, encode_key, Header, SnapshotInfo};
use crate::config::TableOptions;
use crate::error::{FileTableError, Result};
use crate::storage::{OsStorage, Storage};

use super::locks::KeyLocks;
use super::stream::Stream;
use super::Snapshot;

/// Stream of a key's snapshots, oldest first
pub type SnapshotStream = Stream<Snapshot>;

/// Stream of every key in a table
pub type KeyStream = Stream<Vec<u8>>;

/// Handle to a table directory
///
/// The handle holds no data; every call goes to the key's file. Clones share
/// the storage and the write lock stripes.
///
/// ## Concurrency
/// - Reads never lock and are not isolated from writes to the same key.
///   A write truncates the file and then fills it, so a racing read may see
///   an empty or partial file: a short plain value, or `HeaderSizeMismatch`
///   or `Io(UnexpectedEof)` in history mode.
/// - With `lock_writes` (the default), `put`, `put_snapshots` and `remove`
///   on the same key are serialized across this handle and its clones.
/// - Nothing guards against a second handle or another process writing the
///   same key: a history `put` is read-modify-write, so concurrent writers
///   there can lose a snapshot. Keep one writer per table directory.
#[derive(Debug, Clone)]
pub struct Table {
    base_dir: PathBuf,
    storage: Arc<dyn Storage>,
    keep_history: bool,
    locks: Option<Arc<KeyLocks>>,
}

impl Table {
    /// Open a table, creating its directory if needed
    pub fn open(options: TableOptions, storage: Arc<dyn Storage>) -> Result<Self> {
        let table = Self {
            base_dir: options.base_dir,
            storage,
            keep_history: options.keep_history,
            locks: options.lock_writes.then(|| Arc::new(KeyLocks::new())),
        };
        table.recover()?;

        debug!(
            base_dir = %table.base_dir.display(),
            keep_history = table.keep_history,
            "opened table"
        );
        Ok(table)
    }

    /// Same as `open`; an existing table is reused as is
    pub fn create(options: TableOptions, storage: Arc<dyn Storage>) -> Result<Self> {
        Self::open(options, storage)
    }

    /// Open a table on the real filesystem with default options
    pub fn open_path(path: impl Into<PathBuf>, keep_history: bool) -> Result<Self> {
        let options = TableOptions::builder()
            .base_dir(path)
            .keep_history(keep_history)
            .build();
        Self::open(options, Arc::new(OsStorage::new()))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current value of a key
    ///
    /// With history kept this is the newest snapshot.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        if !self.keep_history {
            let path = self.key_path(key)?;
            let mut reader = self.storage.open_read(&path)?;
            let mut value = Vec::new();
            reader.read_to_end(&mut value)?;
            return Ok(value);
        }

        let mut latest = None;
        for snapshot in self.get_snapshots(key) {
            latest = Some(snapshot?);
        }
        latest
            .map(|snapshot| snapshot.value)
            .ok_or(FileTableError::NoSnapshots)
    }

    /// Every snapshot of a key, oldest first
    ///
    /// The file is read progressively on a producer thread: only one value is
    /// held in memory at a time. Fails with `NotFound` for a missing key and
    /// `NoSnapshots` for an empty index, before any snapshot is yielded.
    pub fn get_snapshots(&self, key: &[u8]) -> SnapshotStream {
        let path = match self.key_path(key) {
            Ok(path) => path,
            Err(e) => return Stream::failed(e),
        };
        let storage = Arc::clone(&self.storage);

        Stream::spawn("filetable-snapshots", move |emitter| {
            let mut reader = storage.open_read(&path)?;
            let header = Header::read_from(&mut reader)?;
            if header.snapshots.is_empty() {
                return Err(FileTableError::NoSnapshots);
            }

            for info in header.snapshots {
                let value = read_value(&mut reader, info.byte_size)?;
                trace!(timestamp = info.timestamp, size = info.byte_size, "read snapshot");
                if !emitter.emit(Snapshot { info, value }) {
                    debug!(path = %path.display(), "snapshot stream cancelled");
                    break;
                }
            }
            Ok(())
        })
    }

    /// Every key with a file in the table, in storage order
    ///
    /// A file name that is not an encoded key ends the stream with
    /// `KeyDecode`. A missing table directory (after `drop_table`) ends it
    /// with `Io`, not `NotFound`.
    pub fn keys(&self) -> KeyStream {
        let storage = Arc::clone(&self.storage);
        let base_dir = self.base_dir.clone();

        Stream::spawn("filetable-keys", move |emitter| {
            for entry in storage.list(&base_dir).map_err(FileTableError::Io)? {
                if entry.is_dir {
                    continue;
                }
                let Some(name) = entry.path.file_name() else {
                    continue;
                };
                let key = decode_key(&name.to_string_lossy())?;
                if !emitter.emit(key) {
                    debug!(base_dir = %base_dir.display(), "key stream cancelled");
                    break;
                }
            }
            Ok(())
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write a value
    ///
    /// Without history the file is replaced by `value`. With history the old
    /// header and value region are read back, one snapshot is appended, and
    /// the whole file is rewritten; the cost grows with the key's history.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        let _guard = self.lock(key);

        if !self.keep_history {
            self.rewrite(&path, None, &[value])?;
            debug!(key_len = key.len(), size = value.len(), "put value");
            return Ok(());
        }

        let (mut header, history) = match self.storage.open_read(&path) {
            Ok(mut reader) => {
                let header = Header::read_from(&mut reader)?;
                let mut history = Vec::new();
                reader.read_to_end(&mut history)?;
                if history.len() as u64 != header.value_len() {
                    warn!(
                        path = %path.display(),
                        indexed = header.value_len(),
                        stored = history.len(),
                        "value region does not match header index"
                    );
                }
                (header, history)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (Header::new(), Vec::new()),
            Err(e) => return Err(FileTableError::Io(e)),
        };

        header.snapshots.push(SnapshotInfo {
            timestamp: now_nanos(),
            byte_size: value.len() as u64,
        });
        self.rewrite(&path, Some(&mut header), &[history.as_slice(), value])?;

        debug!(
            key_len = key.len(),
            snapshots = header.snapshots.len(),
            header_size = header.byte_size,
            "appended snapshot"
        );
        Ok(())
    }

    /// Replace a key's whole history with `snapshots`
    ///
    /// Prior content is discarded. Always writes the history format, so it is
    /// meant for tables that keep history. An empty list leaves a file whose
    /// reads fail with `NoSnapshots`.
    pub fn put_snapshots(&self, key: &[u8], snapshots: &[Snapshot]) -> Result<()> {
        let path = self.key_path(key)?;

        for (index, snapshot) in snapshots.iter().enumerate() {
            let actual = snapshot.value.len() as u64;
            if snapshot.info.byte_size != actual {
                return Err(FileTableError::SnapshotSizeMismatch {
                    index,
                    declared: snapshot.info.byte_size,
                    actual,
                });
            }
        }

        let mut header = Header::with_snapshots(snapshots.iter().map(|s| s.info).collect());
        let values: Vec<&[u8]> = snapshots.iter().map(|s| s.value.as_slice()).collect();

        let _guard = self.lock(key);
        self.rewrite(&path, Some(&mut header), &values)?;

        debug!(key_len = key.len(), snapshots = snapshots.len(), "replaced snapshots");
        Ok(())
    }

    /// Delete a key and all of its history
    pub fn remove(&self, key: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        let _guard = self.lock(key);
        self.storage.remove_file(&path)?;
        debug!(key_len = key.len(), "removed key");
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Make sure the table directory exists
    pub fn recover(&self) -> Result<()> {
        self.storage
            .ensure_dir(&self.base_dir)
            .map_err(FileTableError::Io)?;
        debug!(base_dir = %self.base_dir.display(), "recovered table");
        Ok(())
    }

    /// Remove the table directory and every key in it
    ///
    /// Dropping an already dropped table succeeds. `recover` brings back an
    /// empty table.
    pub fn drop_table(&self) -> Result<()> {
        self.storage
            .remove_tree(&self.base_dir)
            .map_err(FileTableError::Io)?;
        debug!(base_dir = %self.base_dir.display(), "dropped table");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the table directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check whether writes keep history
    pub fn keep_history(&self) -> bool {
        self.keep_history
    }

    /// File a key is stored in
    pub fn key_path(&self, key: &[u8]) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(FileTableError::EmptyKey);
        }
        Ok(self.base_dir.join(encode_key(key)))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn lock(&self, key: &[u8]) -> Option<MutexGuard<'_, ()>> {
        self.locks.as_ref().map(|locks| locks.lock(key))
    }

    /// Truncate `path` and write the optional header followed by `chunks`
    fn rewrite(&self, path: &Path, header: Option<&mut Header>, chunks: &[&[u8]]) -> Result<()> {
        let mut writer = self
            .storage
            .create_write(path)
            .map_err(FileTableError::Io)?;
        if let Some(header) = header {
            writer
                .write_all(&header.encode())
                .map_err(FileTableError::Io)?;
        }
        for chunk in chunks {
            writer.write_all(chunk).map_err(FileTableError::Io)?;
        }
        writer.flush().map_err(FileTableError::Io)
    }
}

/// Read exactly `size` bytes without trusting `size` for the allocation
fn read_value<R: Read + ?Sized>(reader: &mut R, size: u64) -> Result<Vec<u8>> {
    let mut value = Vec::new();
    reader.take(size).read_to_end(&mut value)?;
    if (value.len() as u64) < size {
        return Err(FileTableError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("snapshot truncated: expected {} bytes, got {}", size, value.len()),
        )));
    }
    Ok(value)
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
