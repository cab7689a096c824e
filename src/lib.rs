//! # FileTable
//!
//! An embedded key-value store with:
//! - One regular file per key, named by URL-safe base64 of the key
//! - Optional per-key history: every value ever written, indexed by a
//!   self-describing header at the front of the key's file
//! - Lazy, cancellable streaming of snapshots and keys
//! - Pluggable storage (real filesystem or in-memory)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Table                               │
//! │        get / put / remove / keys / snapshots / drop          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Key Codec  │          │   Header    │
//!   │  (base64)   │          │  (varints)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Storage   │
//!                           │ (OS / Mem)  │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use filetable::{MemoryStorage, Table, TableOptions};
//!
//! let options = TableOptions::builder().base_dir("/tables/users").build();
//! let table = Table::open(options, Arc::new(MemoryStorage::new()))?;
//!
//! table.put(b"alice", b"v1")?;
//! table.put(b"alice", b"v2")?;
//! assert_eq!(table.get(b"alice")?, b"v2");
//!
//! for snapshot in table.get_snapshots(b"alice") {
//!     let snapshot = snapshot?;
//!     println!("{} {:?}", snapshot.info.timestamp, snapshot.value);
//! }
//! # Ok::<(), filetable::FileTableError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod storage;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FileTableError, Result};
pub use config::TableOptions;
pub use codec::{Header, SnapshotInfo};
pub use storage::{MemoryStorage, OsStorage, Storage};
pub use table::{KeyStream, Snapshot, SnapshotStream, Table};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FileTable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
