//! Integrity Layer
//!
//! One SHA-256 sidecar per snapshot, holding the raw 32-byte digest of the
//! snapshot file exactly as it sits on disk. Loads verify the sidecar
//! before a single frame is decoded.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use sha2::{Digest as _, Sha256};

use crate::error::{Result, SnapKvError};

use super::catalog::{path_for, ArtifactKind, SnapshotId};

/// Raw SHA-256 digest
pub type Digest = [u8; DIGEST_SIZE];

/// Digest length in bytes
pub const DIGEST_SIZE: usize = 32;

/// Read buffer used while hashing
const CHUNK_SIZE: usize = 64 * 1024;

/// Hash a file's full contents without holding it all in memory
pub fn compute_checksum(path: &Path) -> Result<Digest> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().into())
}

/// Digest the snapshot for `id` and persist it next to the snapshot
///
/// The checksum file is created fresh and synced before returning.
pub fn write_checksum(dir: &Path, id: SnapshotId) -> Result<Digest> {
    let snapshot_path = path_for(dir, id, ArtifactKind::Snapshot);
    let checksum_path = path_for(dir, id, ArtifactKind::Checksum);

    let digest = compute_checksum(&snapshot_path)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&checksum_path)?;
    file.write_all(&digest)?;
    file.sync_all()?;

    tracing::debug!(id, digest = %to_hex(&digest), "wrote snapshot checksum");
    Ok(digest)
}

/// Check the snapshot for `id` against its stored digest
///
/// Fails with `BadSnapshot` if the stored digest is not exactly the
/// recomputed one. A missing checksum file surfaces as an I/O error.
pub fn verify_checksum(dir: &Path, id: SnapshotId) -> Result<Digest> {
    let snapshot_path = path_for(dir, id, ArtifactKind::Snapshot);
    let checksum_path = path_for(dir, id, ArtifactKind::Checksum);

    let stored = fs::read(&checksum_path)?;
    let actual = compute_checksum(&snapshot_path)?;

    if stored.as_slice() != actual.as_slice() {
        tracing::warn!(
            id,
            stored = %hex::encode(&stored),
            actual = %to_hex(&actual),
            "snapshot checksum mismatch"
        );
        return Err(SnapKvError::BadSnapshot { id });
    }

    Ok(actual)
}

/// Lowercase hex rendering of a digest
pub fn to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
