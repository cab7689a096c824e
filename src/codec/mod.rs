//! Codec Module
//!
//! Everything that turns table data into bytes and names.
//!
//! ## Responsibilities
//! - Key ↔ file name mapping (URL-safe base64)
//! - Snapshot header encoding/decoding
//! - LEB128 varints shared by the header fields
//!
//! ## History File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header (ByteSize bytes)                 │
//! ├─────────────────────────────────────────┤
//! │ Value 0 (Index[0].Size bytes)           │
//! │ Value 1 (Index[1].Size bytes)           │
//! │ ...                                     │
//! └─────────────────────────────────────────┘
//! ```

mod header;
mod key;
mod varint;

pub use header::{Header, SnapshotInfo, DEFAULT_HEADER_SIZE};
pub use key::{decode_key, encode_key};
pub use varint::{encode_varint, read_varint, varint_len, MAX_VARINT_LEN};
