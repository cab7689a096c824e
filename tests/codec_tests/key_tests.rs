//! Tests for the key codec
//!
//! These tests verify:
//! - Known encodings (padded, URL-safe alphabet)
//! - Round trips for empty, binary and path-like keys
//! - Rejection of names that are not canonical encoder output

use filetable::codec::{decode_key, encode_key};
use filetable::FileTableError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_known_keys() {
    assert_eq!(encode_key(b"key"), "a2V5");
    assert_eq!(encode_key(b"key2"), "a2V5Mg==");
    assert_eq!(encode_key(b"/"), "Lw==");
}

#[test]
fn test_encode_uses_url_safe_alphabet() {
    // Standard base64 of these bytes is "+/8="
    assert_eq!(encode_key(&[0xfb, 0xff]), "-_8=");
}

#[test]
fn test_encode_empty_key() {
    assert_eq!(encode_key(b""), "");
    assert_eq!(decode_key("").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_encoded_names_are_filesystem_safe() {
    let keys: Vec<Vec<u8>> = vec![
        b"a/b/c".to_vec(),
        b"..".to_vec(),
        vec![0u8; 7],
        (0u8..=255).collect(),
        "키/값".as_bytes().to_vec(),
    ];

    for key in keys {
        let name = encode_key(&key);
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='),
            "unsafe character in {:?}",
            name
        );
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_roundtrip_every_single_byte() {
    for b in 0u8..=255 {
        let key = [b];
        assert_eq!(decode_key(&encode_key(&key)).unwrap(), key);
    }
}

#[test]
fn test_roundtrip_unsafe_keys() {
    let keys: Vec<Vec<u8>> = vec![
        b"path/with/separators".to_vec(),
        b"back\\slash".to_vec(),
        b"nul\0inside".to_vec(),
        vec![0x80, 0xff, 0xfe, 0x00],
        "日本語".as_bytes().to_vec(),
        b"=padding=".to_vec(),
    ];

    for key in keys {
        assert_eq!(decode_key(&encode_key(&key)).unwrap(), key);
    }
}

#[test]
fn test_roundtrip_all_lengths() {
    // Covers all three padding cases several times over
    for len in 0..32usize {
        let key: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
        assert_eq!(decode_key(&encode_key(&key)).unwrap(), key);
    }
}

// =============================================================================
// Decode Error Tests
// =============================================================================

#[test]
fn test_decode_rejects_missing_padding() {
    let result = decode_key("a2V5Mg");
    assert!(matches!(result, Err(FileTableError::KeyDecode(_))));
}

#[test]
fn test_decode_rejects_standard_alphabet() {
    let result = decode_key("+/8=");
    assert!(matches!(result, Err(FileTableError::KeyDecode(_))));
}

#[test]
fn test_decode_rejects_non_canonical_trailing_bits() {
    // "Mg==" is canonical for "2"; "Mh==" carries stray low bits
    assert_eq!(decode_key("a2V5Mg==").unwrap(), b"key2");
    let result = decode_key("a2V5Mh==");
    assert!(matches!(result, Err(FileTableError::KeyDecode(_))));
}

#[test]
fn test_decode_rejects_garbage() {
    for name in ["not base64!", "a2V5.tmp", "a", "===="] {
        let result = decode_key(name);
        assert!(
            matches!(result, Err(FileTableError::KeyDecode(_))),
            "{:?} should not decode",
            name
        );
    }
}
