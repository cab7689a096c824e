//! Configuration for FileTable
//!
//! Table options with sensible defaults.

use std::path::PathBuf;

/// Options for opening a table
#[derive(Debug, Clone)]
pub struct TableOptions {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding one file per key
    /// Internal structure:
    ///   {base_dir}/
    ///     ├── a2V5         (file for key "key")
    ///     └── a2V5Mg==     (file for key "key2")
    pub base_dir: PathBuf,

    // -------------------------------------------------------------------------
    // History Configuration
    // -------------------------------------------------------------------------
    /// Keep every value ever written (header + concatenated snapshots)
    /// instead of overwriting the file with the latest value
    pub keep_history: bool,

    // -------------------------------------------------------------------------
    // Concurrency Configuration
    // -------------------------------------------------------------------------
    /// Serialize writes to the same key made through this table handle.
    /// Writers in other processes are never excluded.
    pub lock_writes: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./filetable_data"),
            keep_history: true,
            lock_writes: true,
        }
    }
}

impl TableOptions {
    /// Create a new options builder
    pub fn builder() -> TableOptionsBuilder {
        TableOptionsBuilder::default()
    }
}

/// Builder for TableOptions
#[derive(Default)]
pub struct TableOptionsBuilder {
    options: TableOptions,
}

impl TableOptionsBuilder {
    /// Set the base directory of the table
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.base_dir = path.into();
        self
    }

    /// Keep per-key snapshot history
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.options.keep_history = keep;
        self
    }

    /// Serialize same-key writes within this handle
    pub fn lock_writes(mut self, lock: bool) -> Self {
        self.options.lock_writes = lock;
        self
    }

    pub fn build(self) -> TableOptions {
        self.options
    }
}
