//! Varint (LEB128) Codec
//!
//! Unsigned variable-length integers: seven bits per byte, low bits first,
//! high bit set on every byte except the last.

use std::io::{self, Read};

/// Longest encoding of a u64
pub const MAX_VARINT_LEN: usize = 10;

/// Encode a u64 as a variable-length integer, appending to `buf`.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes `encode_varint` emits for `value`.
pub fn varint_len(value: u64) -> usize {
    let bits = (64 - value.leading_zeros() as usize).max(1);
    bits.div_ceil(7)
}

/// Read one varint from `reader`.
///
/// Fails with `UnexpectedEof` on a truncated stream and `InvalidData` when the
/// encoding does not fit in a u64.
pub fn read_varint<R: Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    let mut value: u64 = 0;
    let mut byte = [0u8; 1];

    for i in 0..MAX_VARINT_LEN {
        reader.read_exact(&mut byte)?;
        let b = byte[0];
        let shift = 7 * i as u32;

        // The tenth byte may only carry the single remaining bit
        if i == MAX_VARINT_LEN - 1 && b > 1 {
            return Err(overflow());
        }
        value |= ((b & 0x7F) as u64) << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }

    Err(overflow())
}

fn overflow() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "varint overflows a 64-bit integer")
}
