//! Snapshot Catalog
//!
//! Names, discovers and orders snapshot files in a directory.
//!
//! ## Naming
//! - snapshot: `{id:06}.snap`
//! - checksum: `{id:06}.sha256`
//!
//! Identifier 0 is reserved for "no snapshot" and never names a file.
//! Only `.snap` files take part in discovery; a checksum sidecar on its own
//! does not make an identifier exist.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SnapKvError};

/// Monotonically increasing snapshot number within a directory
pub type SnapshotId = u64;

/// Number of decimal digits in a snapshot file stem
pub const ID_DIGITS: usize = 6;

/// Largest identifier that fits the fixed-width name
pub const MAX_ID: SnapshotId = 999_999;

/// Extension of snapshot files
pub const SNAPSHOT_EXT: &str = "snap";

/// Extension of checksum files
pub const CHECKSUM_EXT: &str = "sha256";

/// The two artifacts stored per snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Snapshot,
    Checksum,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Snapshot => SNAPSHOT_EXT,
            ArtifactKind::Checksum => CHECKSUM_EXT,
        }
    }
}

/// A snapshot discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: SnapshotId,
    pub snapshot_path: PathBuf,
    pub checksum_path: PathBuf,
    /// Whether the checksum sidecar is present
    pub has_checksum: bool,
    /// Snapshot file size in bytes
    pub file_size: u64,
}

// =============================================================================
// Paths
// =============================================================================

/// Path of an artifact for a given identifier
///
/// "dir", 42, Snapshot → "dir/000042.snap"
pub fn path_for(dir: &Path, id: SnapshotId, kind: ArtifactKind) -> PathBuf {
    clean_path(&dir.join(file_name(id, kind)))
}

/// File name of an artifact for a given identifier
pub fn file_name(id: SnapshotId, kind: ArtifactKind) -> String {
    format!("{:0width$}.{}", id, kind.extension(), width = ID_DIGITS)
}

/// Parse a snapshot identifier from a file name
///
/// "000042.snap" → Some(42); anything else → None
pub fn parse_id(name: &str) -> Option<SnapshotId> {
    let stem = name.strip_suffix(SNAPSHOT_EXT)?.strip_suffix('.')?;
    if stem.len() != ID_DIGITS || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match stem.parse() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into a preceding
/// normal component. Does not touch the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // ".." at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

// =============================================================================
// Discovery
// =============================================================================

/// All snapshot identifiers in a directory, ascending
///
/// Entries that are not regular files or do not match `NNNNNN.snap` are
/// ignored.
pub fn list_ids(dir: &Path) -> Result<Vec<SnapshotId>> {
    let mut ids = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        if let Some(id) = name.to_str().and_then(parse_id) {
            ids.push(id);
        }
    }

    ids.sort_unstable();
    Ok(ids)
}

/// Highest identifier present, or 0 if the directory holds no snapshots
pub fn max_id(dir: &Path) -> Result<SnapshotId> {
    Ok(list_ids(dir)?.last().copied().unwrap_or(0))
}

/// Identifier the next snapshot should be written under
pub fn next_id(dir: &Path) -> Result<SnapshotId> {
    let next = max_id(dir)? + 1;
    if next > MAX_ID {
        return Err(SnapKvError::IdSpaceExhausted { max: MAX_ID });
    }
    Ok(next)
}

/// Describe every snapshot in a directory, oldest first
pub fn list(dir: &Path) -> Result<Vec<SnapshotEntry>> {
    list_ids(dir)?
        .into_iter()
        .map(|id| {
            let snapshot_path = path_for(dir, id, ArtifactKind::Snapshot);
            let checksum_path = path_for(dir, id, ArtifactKind::Checksum);
            let file_size = fs::metadata(&snapshot_path)?.len();
            let has_checksum = checksum_path.is_file();
            Ok(SnapshotEntry {
                id,
                snapshot_path,
                checksum_path,
                has_checksum,
                file_size,
            })
        })
        .collect()
}
