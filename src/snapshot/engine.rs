//! Snapshot Engine
//!
//! Save and load protocols over a MemTable. Callers are expected to hold
//! whatever lock guards the table for the whole call; nothing here locks.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use crate::config::LoadMode;
use crate::error::{Result, SnapKvError};
use crate::memtable::MemTable;

use super::catalog::{max_id, next_id, path_for, ArtifactKind, SnapshotId};
use super::checksum::{to_hex, verify_checksum, write_checksum, Digest};
use super::compression::Compression;
use super::frame::{self, FrameReader};
use super::retention::{check_history, cleanup_up_to};

/// Outcome of a completed save or load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Identifier of the snapshot written or read
    pub id: SnapshotId,
    /// Path of the snapshot file
    pub path: PathBuf,
    /// Frames written, or frames decoded
    pub entry_count: u64,
    /// Snapshot file size on disk
    pub file_size: u64,
    /// SHA-256 of the snapshot file
    pub digest: Digest,
}

// =============================================================================
// Save
// =============================================================================

/// Write every entry of `table` to a new snapshot in `dir`
///
/// Steps:
/// 1. Allocate the next identifier (creating `dir` if needed)
/// 2. Create the snapshot file exclusively
/// 3. Encode each entry as a frame through `compression`
/// 4. Finish the stream, flush and sync the file
/// 5. Write the checksum sidecar
/// 6. Sweep snapshots beyond `history_depth`
///
/// The table is only read. A failure in steps 3-5 removes the new snapshot
/// and its checksum before the error is returned, so the previous snapshot
/// stays the newest one on disk.
pub fn save_snapshot(
    table: &MemTable,
    dir: &Path,
    history_depth: u32,
    compression: Compression,
) -> Result<SnapshotSummary> {
    check_history(history_depth)?;

    // Step 1: Allocate identifier
    fs::create_dir_all(dir)?;
    let id = next_id(dir)?;
    let path = path_for(dir, id, ArtifactKind::Snapshot);

    // Step 2: Exclusive create, never overwrite an existing snapshot
    let file = OpenOptions::new().write(true).create_new(true).open(&path)?;

    // Steps 3-5: on failure the new pair is removed again
    let (entry_count, file_size, digest) =
        match write_snapshot(table, file, dir, id, compression) {
            Ok(written) => written,
            Err(e) => {
                discard_snapshot(dir, id);
                return Err(e);
            }
        };

    // Step 6: Retention
    let deleted = cleanup_up_to(dir, history_depth)?;

    tracing::info!(
        id,
        entries = entry_count,
        bytes = file_size,
        expired = deleted.len(),
        "snapshot saved"
    );

    Ok(SnapshotSummary {
        id,
        path,
        entry_count,
        file_size,
        digest,
    })
}

/// Steps 3-5 of the save: frames, durability, checksum
fn write_snapshot(
    table: &MemTable,
    file: File,
    dir: &Path,
    id: SnapshotId,
    compression: Compression,
) -> Result<(u64, u64, Digest)> {
    // Step 3: Frames
    let mut writer = compression.wrap_writer(BufWriter::new(file));
    let mut entry_count = 0u64;
    for (key, value) in table.iter() {
        frame::encode_into(&mut writer, key, value)?;
        entry_count += 1;
    }

    // Step 4: Durability
    let file = writer
        .finish()?
        .into_inner()
        .map_err(|e| SnapKvError::Io(e.into_error()))?;
    file.sync_all()?;
    let file_size = file.metadata()?.len();
    drop(file);

    // Step 5: Checksum
    let digest = write_checksum(dir, id)?;

    Ok((entry_count, file_size, digest))
}

/// Best-effort removal of a half-written snapshot pair
fn discard_snapshot(dir: &Path, id: SnapshotId) {
    for kind in [ArtifactKind::Snapshot, ArtifactKind::Checksum] {
        let path = path_for(dir, id, kind);
        match fs::remove_file(&path) {
            Ok(()) => tracing::warn!(
                id,
                path = %path.display(),
                "removed incomplete snapshot file"
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                id,
                path = %path.display(),
                error = %e,
                "failed to remove incomplete snapshot file"
            ),
        }
    }
}

// =============================================================================
// Load
// =============================================================================

/// Replace the contents of `table` with the newest snapshot in `dir`
///
/// The table is cleared first, whatever happens next:
/// - no snapshot → `SnapshotNotFound`, table empty
/// - checksum mismatch → `BadSnapshot`, table empty
/// - decode error → returned; with `LoadMode::Incremental` the table keeps
///   the frames decoded before the error, with `LoadMode::Atomic` it stays
///   empty
pub fn load_snapshot(
    table: &mut MemTable,
    dir: &Path,
    compression: Compression,
    mode: LoadMode,
) -> Result<SnapshotSummary> {
    table.clear();

    let id = max_id(dir)?;
    if id == 0 {
        return Err(SnapKvError::SnapshotNotFound);
    }

    let summary = match mode {
        LoadMode::Incremental => match apply_snapshot(table, dir, id, compression) {
            Ok(summary) => summary,
            Err(e) => {
                if e.is_frame_error() {
                    tracing::warn!(
                        id,
                        applied = table.entry_count(),
                        error = %e,
                        "snapshot load aborted, map partially populated"
                    );
                }
                return Err(e);
            }
        },
        LoadMode::Atomic => {
            let (fresh, summary) = read_snapshot(dir, id, compression)?;
            *table = fresh;
            summary
        }
    };

    tracing::info!(
        id,
        entries = summary.entry_count,
        bytes = summary.file_size,
        digest = %to_hex(&summary.digest),
        "snapshot loaded"
    );

    Ok(summary)
}

/// Verify and decode one specific snapshot into a fresh table
pub fn read_snapshot(
    dir: &Path,
    id: SnapshotId,
    compression: Compression,
) -> Result<(MemTable, SnapshotSummary)> {
    let mut table = MemTable::new();
    let summary = apply_snapshot(&mut table, dir, id, compression)?;
    Ok((table, summary))
}

/// Verify the checksum of `id`, then insert its frames into `table` in
/// file order. Later frames for a repeated key win.
fn apply_snapshot(
    table: &mut MemTable,
    dir: &Path,
    id: SnapshotId,
    compression: Compression,
) -> Result<SnapshotSummary> {
    // Nothing is decoded until the file is known to be intact.
    let digest = verify_checksum(dir, id)?;

    let path = path_for(dir, id, ArtifactKind::Snapshot);
    let file = File::open(&path)?;
    let file_size = file.metadata()?.len();

    let mut frames = FrameReader::new(compression.wrap_reader(BufReader::new(file)));
    for frame in frames.by_ref() {
        let (key, value) = frame?;
        table.put(key, value);
    }

    Ok(SnapshotSummary {
        id,
        path,
        entry_count: frames.frames_read(),
        file_size,
        digest,
    })
}
