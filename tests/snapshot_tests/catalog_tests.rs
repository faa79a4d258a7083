//! Tests for the snapshot catalog
//!
//! These tests verify:
//! - File naming and parsing
//! - Discovery ignores foreign files and directories
//! - max/next identifier allocation
//! - Path cleaning

use std::fs;
use std::path::{Path, PathBuf};

use snapkv::snapshot::catalog::{
    self, clean_path, file_name, list_ids, max_id, next_id, parse_id, path_for, ArtifactKind,
    MAX_ID,
};
use snapkv::SnapKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"x").unwrap();
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_file_names_are_zero_padded() {
    assert_eq!(file_name(1, ArtifactKind::Snapshot), "000001.snap");
    assert_eq!(file_name(42, ArtifactKind::Checksum), "000042.sha256");
    assert_eq!(file_name(999_999, ArtifactKind::Snapshot), "999999.snap");
}

#[test]
fn test_parse_id_accepts_only_exact_pattern() {
    assert_eq!(parse_id("000001.snap"), Some(1));
    assert_eq!(parse_id("123456.snap"), Some(123_456));

    assert_eq!(parse_id("000000.snap"), None); // reserved
    assert_eq!(parse_id("00001.snap"), None);
    assert_eq!(parse_id("0000001.snap"), None);
    assert_eq!(parse_id("000001.sha256"), None);
    assert_eq!(parse_id("00000a.snap"), None);
    assert_eq!(parse_id("+00001.snap"), None);
    assert_eq!(parse_id("000001snap"), None);
    assert_eq!(parse_id("000001.snap.tmp"), None);
}

#[test]
fn test_path_for_is_distinct_per_kind() {
    let dir = Path::new("/data/snaps");

    let snap = path_for(dir, 7, ArtifactKind::Snapshot);
    let sum = path_for(dir, 7, ArtifactKind::Checksum);

    assert_eq!(snap, PathBuf::from("/data/snaps/000007.snap"));
    assert_eq!(sum, PathBuf::from("/data/snaps/000007.sha256"));
    assert_ne!(snap, path_for(dir, 8, ArtifactKind::Snapshot));
}

#[test]
fn test_path_for_cleans_directory() {
    let dir = Path::new("/data/./tmp/../snaps/");

    assert_eq!(
        path_for(dir, 3, ArtifactKind::Snapshot),
        PathBuf::from("/data/snaps/000003.snap")
    );
}

#[test]
fn test_clean_path() {
    assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
    assert_eq!(clean_path(Path::new("../a")), PathBuf::from("../a"));
    assert_eq!(clean_path(Path::new("a/../..")), PathBuf::from(".."));
    assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
    assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_list_ids_empty_directory() {
    let (_temp, dir) = setup_temp_dir();

    assert!(list_ids(&dir).unwrap().is_empty());
    assert_eq!(max_id(&dir).unwrap(), 0);
    assert_eq!(next_id(&dir).unwrap(), 1);
}

#[test]
fn test_list_ids_sorted_ascending() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, "000010.snap");
    touch(&dir, "000002.snap");
    touch(&dir, "000007.snap");

    assert_eq!(list_ids(&dir).unwrap(), vec![2, 7, 10]);
    assert_eq!(max_id(&dir).unwrap(), 10);
    assert_eq!(next_id(&dir).unwrap(), 11);
}

#[test]
fn test_list_ids_ignores_foreign_entries() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, "000001.snap");
    touch(&dir, "000005.sha256"); // orphan checksum does not count
    touch(&dir, "notes.txt");
    touch(&dir, "1.snap");
    fs::create_dir(dir.join("000009.snap")).unwrap(); // not a regular file

    assert_eq!(list_ids(&dir).unwrap(), vec![1]);
}

#[test]
fn test_list_ids_tolerates_gaps() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, "000001.snap");
    touch(&dir, "000004.snap");

    assert_eq!(list_ids(&dir).unwrap(), vec![1, 4]);
    assert_eq!(next_id(&dir).unwrap(), 5);
}

#[test]
fn test_list_ids_missing_directory_is_io_error() {
    let (_temp, dir) = setup_temp_dir();
    let missing = dir.join("nope");

    let err = list_ids(&missing).unwrap_err();
    assert!(matches!(err, SnapKvError::Io(_)));
}

#[test]
fn test_next_id_exhausted() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, &file_name(MAX_ID, ArtifactKind::Snapshot));

    let err = next_id(&dir).unwrap_err();
    assert!(matches!(err, SnapKvError::IdSpaceExhausted { max: 999_999 }));
}

#[test]
fn test_list_reports_checksum_presence_and_size() {
    let (_temp, dir) = setup_temp_dir();
    fs::write(dir.join("000001.snap"), b"abcd").unwrap();
    fs::write(dir.join("000001.sha256"), [0u8; 32]).unwrap();
    fs::write(dir.join("000002.snap"), b"abcdefgh").unwrap();

    let entries = catalog::list(&dir).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, 1);
    assert!(entries[0].has_checksum);
    assert_eq!(entries[0].file_size, 4);
    assert_eq!(entries[1].id, 2);
    assert!(!entries[1].has_checksum);
    assert_eq!(entries[1].file_size, 8);
}
