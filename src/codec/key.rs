//! Key Codec
//!
//! Maps arbitrary byte keys to file names and back using padded URL-safe
//! base64. The alphabet (`A-Z a-z 0-9 - _ =`) contains no path separators or
//! control characters, so every encoded key is a single legal file name.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use crate::error::Result;

/// Encode a key into its file name
pub fn encode_key(key: &[u8]) -> String {
    URL_SAFE.encode(key)
}

/// Decode a file name back into the key it was encoded from
///
/// Only canonical `encode_key` output is accepted: wrong alphabet, missing or
/// extra padding, and non-zero trailing bits are all rejected.
pub fn decode_key(name: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE.decode(name)?)
}
