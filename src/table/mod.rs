//! Table Module
//!
//! The snapshot store built on the codecs and a `Storage`.
//!
//! ## Responsibilities
//! - Map keys to files (`codec::encode_key`)
//! - Plain mode: one file holds the latest value
//! - History mode: header + every value ever written, rewritten per put
//! - Stream snapshots and keys lazily with backpressure
//! - Serialize same-key writes within a handle (optional)

mod handle;
mod locks;
mod stream;

pub use handle::{KeyStream, SnapshotStream, Table};
pub use stream::Stream;

use crate::codec::SnapshotInfo;

/// One stored value of a key with its write time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub info: SnapshotInfo,
    pub value: Vec<u8>,
}

impl Snapshot {
    /// Build a snapshot whose size matches `value`
    pub fn new(timestamp: u64, value: impl Into<Vec<u8>>) -> Self {
        let value = value.into();
        Self {
            info: SnapshotInfo {
                timestamp,
                byte_size: value.len() as u64,
            },
            value,
        }
    }
}
