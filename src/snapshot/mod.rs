//! Snapshot Module
//!
//! Point-in-time serialization of a MemTable to numbered files on disk.
//!
//! ## Responsibilities
//! - Encode/decode entries as length-prefixed frames
//! - Name, discover and order snapshot files in a directory
//! - Write and verify a SHA-256 sidecar per snapshot
//! - Delete snapshot pairs beyond the configured history depth
//! - Drive save and load end to end
//!
//! ## Directory Layout
//! ```text
//! {dir}/
//!   ├── 000001.snap      frames (optionally gzip-wrapped)
//!   ├── 000001.sha256    32 raw digest bytes of 000001.snap
//!   ├── 000002.snap
//!   └── 000002.sha256
//! ```
//!
//! ## Frame Format (little-endian)
//! ```text
//! ┌──────────────┬────────────┬─────────┬──────────────┬───────────┐
//! │FrameLen (4)  │ KeyLen (4) │   Key   │ ValueLen (4) │   Value   │
//! └──────────────┴────────────┴─────────┴──────────────┴───────────┘
//!   FrameLen = 8 + KeyLen + ValueLen
//!   ... repeated for each entry, no header, no footer ...
//! ```

pub mod catalog;
pub mod checksum;
pub mod compression;
pub mod engine;
pub mod frame;
pub mod retention;

pub use catalog::{ArtifactKind, SnapshotEntry, SnapshotId};
pub use checksum::Digest;
pub use compression::Compression;
pub use engine::{load_snapshot, read_snapshot, save_snapshot, SnapshotSummary};
pub use frame::FrameReader;
pub use retention::MAX_HISTORY;
