//! Retention Manager
//!
//! Keeps the newest `keep + 1` snapshots (the current one plus `keep`
//! predecessors) and deletes the rest, oldest first, snapshot and checksum
//! together.
//!
//! The sweep is not transactional: the first failed deletion stops it and
//! is returned, and whatever was already deleted stays deleted.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, SnapKvError};

use super::catalog::{list_ids, path_for, ArtifactKind, SnapshotId};

/// Largest accepted history depth
pub const MAX_HISTORY: u32 = 999_999;

/// Reject a history depth above `MAX_HISTORY`
pub fn check_history(keep: u32) -> Result<()> {
    if keep > MAX_HISTORY {
        return Err(SnapKvError::TooMuchHistory {
            requested: keep,
            max: MAX_HISTORY,
        });
    }
    Ok(())
}

/// Delete all but the newest `keep + 1` snapshots in `dir`
///
/// Returns the identifiers that were deleted, oldest first.
pub fn cleanup_up_to(dir: &Path, keep: u32) -> Result<Vec<SnapshotId>> {
    check_history(keep)?;

    let ids = list_ids(dir)?;
    let retained = keep as usize + 1;
    if ids.len() <= retained {
        return Ok(Vec::new());
    }

    let excess = ids.len() - retained;
    let mut deleted = Vec::with_capacity(excess);

    for &id in &ids[..excess] {
        remove_artifact(dir, id, ArtifactKind::Snapshot)?;
        remove_artifact(dir, id, ArtifactKind::Checksum)?;
        tracing::debug!(id, "deleted expired snapshot");
        deleted.push(id);
    }

    Ok(deleted)
}

/// Remove one artifact; one that is already gone counts as removed
fn remove_artifact(dir: &Path, id: SnapshotId, kind: ArtifactKind) -> Result<()> {
    match fs::remove_file(path_for(dir, id, kind)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
