//! Snapshot Header
//!
//! The self-describing prefix of a history file. It records its own encoded
//! size, so readers can skip padding and land exactly on the first value.
//!
//! ## Layout
//! ```text
//! ┌───────────────────┬────────────────────┐
//! │ ByteSize (varint) │ Count (varint)     │
//! ├───────────────────┴────────────────────┤
//! │ Index (Count times)                    │
//! │   [Timestamp: u64 BE (8)][Size varint] │
//! ├────────────────────────────────────────┤
//! │ Zero padding up to ByteSize            │
//! └────────────────────────────────────────┘
//! ```

use std::io::{self, Read, Write};

use crate::error::{FileTableError, Result};

use super::varint::{encode_varint, read_varint, varint_len, MAX_VARINT_LEN};

/// Declared size of a freshly created header
pub const DEFAULT_HEADER_SIZE: u64 = 16;

/// Upper bound on index entries reserved before they are actually read
const PREALLOC_LIMIT: u64 = 1024;

/// Write time and length of one stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotInfo {
    /// Nanoseconds since the Unix epoch
    pub timestamp: u64,
    /// Length of the value in bytes
    pub byte_size: u64,
}

/// Index of every snapshot stored in a history file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Exact encoded size of this header, padding included
    pub byte_size: u64,
    /// Oldest first
    pub snapshots: Vec<SnapshotInfo>,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Empty header with the default declared size
    pub fn new() -> Self {
        Self::with_snapshots(Vec::new())
    }

    pub fn with_snapshots(snapshots: Vec<SnapshotInfo>) -> Self {
        Self {
            byte_size: DEFAULT_HEADER_SIZE,
            snapshots,
        }
    }

    /// Total bytes of the values that follow the header
    pub fn value_len(&self) -> u64 {
        self.snapshots.iter().map(|s| s.byte_size).sum()
    }

    /// Decode a header from the start of `reader`
    ///
    /// On success the reader is positioned on the first value byte.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut counter = CountingReader::new(reader);

        let byte_size = read_varint(&mut counter)?;
        let count = read_varint(&mut counter)?;

        let mut snapshots = Vec::with_capacity(count.min(PREALLOC_LIMIT) as usize);
        for _ in 0..count {
            let mut timestamp = [0u8; 8];
            counter.read_exact(&mut timestamp)?;
            let size = read_varint(&mut counter)?;
            snapshots.push(SnapshotInfo {
                timestamp: u64::from_be_bytes(timestamp),
                byte_size: size,
            });

            if counter.count > byte_size {
                return Err(FileTableError::HeaderSizeMismatch {
                    declared: byte_size,
                    consumed: counter.count,
                });
            }
        }

        if counter.count > byte_size {
            return Err(FileTableError::HeaderSizeMismatch {
                declared: byte_size,
                consumed: counter.count,
            });
        }

        // Padding has no length prefix; consume it until the counts meet
        let padding = byte_size - counter.count;
        let skipped = io::copy(&mut (&mut counter).take(padding), &mut io::sink())?;
        if skipped < padding {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "header padding truncated",
            )
            .into());
        }

        Ok(Self {
            byte_size,
            snapshots,
        })
    }

    /// Size `encode` would produce, without touching `byte_size`
    pub fn encoded_len(&self) -> u64 {
        settled_size(self.byte_size, self.encode_index().len() as u64)
    }

    /// Encode the header, growing `byte_size` first if the index outgrew it
    pub fn encode(&mut self) -> Vec<u8> {
        let body = self.encode_index();
        self.byte_size = settled_size(self.byte_size, body.len() as u64);

        let mut out = Vec::with_capacity(self.byte_size as usize);
        encode_varint(self.byte_size, &mut out);
        out.extend_from_slice(&body);
        out.resize(self.byte_size as usize, 0);
        out
    }

    /// Encode into `writer`, returning the number of bytes written
    pub fn write_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> Result<u64> {
        let encoded = self.encode();
        writer.write_all(&encoded)?;
        Ok(encoded.len() as u64)
    }

    /// Count and index entries, everything after the size field
    fn encode_index(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(MAX_VARINT_LEN * (1 + 2 * self.snapshots.len()));
        encode_varint(self.snapshots.len() as u64, &mut body);
        for snapshot in &self.snapshots {
            body.extend_from_slice(&snapshot.timestamp.to_be_bytes());
            encode_varint(snapshot.byte_size, &mut body);
        }
        body
    }
}

/// Grow `size` until it covers its own varint plus the index.
///
/// Each growth either settles or lengthens the size varint, which is capped
/// at MAX_VARINT_LEN bytes, so the loop is bounded.
fn settled_size(mut size: u64, body_len: u64) -> u64 {
    for _ in 0..=MAX_VARINT_LEN {
        let needed = varint_len(size) as u64 + body_len;
        if needed <= size {
            break;
        }
        size = needed;
    }
    debug_assert!(varint_len(size) as u64 + body_len <= size);
    size
}

/// Read adapter that counts consumed bytes
struct CountingReader<'a, R: ?Sized> {
    inner: &'a mut R,
    count: u64,
}

impl<'a, R: Read + ?Sized> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read + ?Sized> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
