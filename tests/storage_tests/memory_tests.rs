//! Tests for MemoryStorage
//!
//! These tests verify:
//! - Directory creation with parents, idempotently
//! - Create/truncate, read back, remove
//! - Recursive removal that respects path components
//! - Sorted recursive listing
//! - NotFound reporting

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use filetable::storage::{MemoryStorage, Storage, StorageEntry};

// =============================================================================
// Helper Functions
// =============================================================================

fn write_file(storage: &MemoryStorage, path: &str, content: &[u8]) {
    let mut writer = storage.create_write(Path::new(path)).unwrap();
    writer.write_all(content).unwrap();
    writer.flush().unwrap();
}

fn read_file(storage: &MemoryStorage, path: &str) -> Vec<u8> {
    let mut reader = storage.open_read(Path::new(path)).unwrap();
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).unwrap();
    buf
}

fn listed(storage: &MemoryStorage, root: &str) -> Vec<(String, bool)> {
    storage
        .list(Path::new(root))
        .unwrap()
        .into_iter()
        .map(|StorageEntry { path, is_dir }| (path.display().to_string(), is_dir))
        .collect()
}

// =============================================================================
// Directory Tests
// =============================================================================

#[test]
fn test_ensure_dir_creates_parents() {
    let storage = MemoryStorage::new();

    storage.ensure_dir(Path::new("/path/to/hello/world")).unwrap();

    assert!(storage.is_dir(Path::new("/path")));
    assert!(storage.is_dir(Path::new("/path/to")));
    assert!(storage.is_dir(Path::new("/path/to/hello")));
    assert!(storage.is_dir(Path::new("/path/to/hello/world")));
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/table")).unwrap();
    write_file(&storage, "/table/a", b"1");

    storage.ensure_dir(Path::new("/table")).unwrap();

    assert_eq!(read_file(&storage, "/table/a"), b"1");
}

#[test]
fn test_ensure_dir_through_file_fails() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/table")).unwrap();
    write_file(&storage, "/table/file", b"x");

    assert!(storage.ensure_dir(Path::new("/table/file/sub")).is_err());
}

#[test]
fn test_remove_tree_respects_components() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/path/to/hello/world")).unwrap();
    write_file(&storage, "/path/toto", b"keep me");

    storage.remove_tree(Path::new("/path/to")).unwrap();

    assert_eq!(
        listed(&storage, "/"),
        vec![
            ("/path".to_string(), true),
            ("/path/toto".to_string(), false),
        ]
    );
}

#[test]
fn test_remove_tree_absent_is_ok() {
    let storage = MemoryStorage::new();
    storage.remove_tree(Path::new("/never/created")).unwrap();
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_write_then_read() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/path/to")).unwrap();

    write_file(&storage, "/path/to/myfile.txt", b"content");

    assert_eq!(read_file(&storage, "/path/to/myfile.txt"), b"content");
}

#[test]
fn test_create_truncates() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();
    write_file(&storage, "/t/f", b"a long first value");

    write_file(&storage, "/t/f", b"short");

    assert_eq!(read_file(&storage, "/t/f"), b"short");
}

#[test]
fn test_writes_append_within_one_writer() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();

    let mut writer = storage.create_write(Path::new("/t/f")).unwrap();
    writer.write_all(b"head").unwrap();
    writer.write_all(b"-tail").unwrap();
    drop(writer);

    assert_eq!(read_file(&storage, "/t/f"), b"head-tail");
}

#[test]
fn test_reader_is_a_point_in_time_copy() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();
    write_file(&storage, "/t/f", b"old");

    let mut reader = storage.open_read(Path::new("/t/f")).unwrap();
    write_file(&storage, "/t/f", b"new");

    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).unwrap();
    assert_eq!(buf, b"old");
}

#[test]
fn test_create_without_parent_is_not_found() {
    let storage = MemoryStorage::new();

    let err = storage.create_write(Path::new("/missing/f")).err().unwrap();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_open_missing_is_not_found() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();

    let err = storage.open_read(Path::new("/t/nope")).err().unwrap();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_open_directory_fails() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();

    let err = storage.open_read(Path::new("/t")).err().unwrap();

    assert_ne!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_remove_file() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();
    write_file(&storage, "/t/f", b"x");

    storage.remove_file(Path::new("/t/f")).unwrap();

    assert!(storage.file_contents(Path::new("/t/f")).is_none());
    let err = storage.remove_file(Path::new("/t/f")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_write_after_remove_fails() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t")).unwrap();

    let mut writer = storage.create_write(Path::new("/t/f")).unwrap();
    storage.remove_tree(Path::new("/t")).unwrap();

    assert!(writer.write_all(b"late").is_err());
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_list_is_recursive_and_sorted() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t/sub")).unwrap();
    write_file(&storage, "/t/b", b"");
    write_file(&storage, "/t/a", b"");
    write_file(&storage, "/t/sub/c", b"");

    assert_eq!(
        listed(&storage, "/t"),
        vec![
            ("/t/a".to_string(), false),
            ("/t/b".to_string(), false),
            ("/t/sub".to_string(), true),
            ("/t/sub/c".to_string(), false),
        ]
    );
}

#[test]
fn test_list_missing_root_is_not_found() {
    let storage = MemoryStorage::new();

    let err = storage.list(Path::new("/nope")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_paths_are_normalized() {
    let storage = MemoryStorage::new();
    storage.ensure_dir(Path::new("/t/")).unwrap();
    write_file(&storage, "/t/./f", b"x");

    assert_eq!(
        storage.file_contents(&PathBuf::from("/t/f")),
        Some(b"x".to_vec())
    );
}

#[test]
fn test_clones_share_state() {
    let storage = MemoryStorage::new();
    let other = storage.clone();
    storage.ensure_dir(Path::new("/t")).unwrap();

    write_file(&other, "/t/f", b"shared");

    assert_eq!(read_file(&storage, "/t/f"), b"shared");
}
