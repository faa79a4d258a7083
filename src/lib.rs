//! # SnapKV
//!
//! An embedded, in-process key-value store with:
//! - A single lock guarding every operation
//! - On-demand snapshots of the whole map to numbered files
//! - SHA-256 sidecar checksums verified before any load
//! - Bounded snapshot history with automatic cleanup
//! - Optional gzip compression of snapshot files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                               │
//! │           (one Mutex: put/get/delete/save/load)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │  MemTable   │◄─────────│ Snapshot Engine │
//!   │  (HashMap)  │          │  (save / load)  │
//!   └─────────────┘          └────────┬────────┘
//!                                     │
//!          ┌──────────────┬───────────┼───────────────┐
//!          ▼              ▼           ▼               ▼
//!   ┌────────────┐ ┌────────────┐ ┌──────────┐ ┌────────────┐
//!   │Frame Codec │ │  Catalog   │ │ Checksum │ │ Retention  │
//!   │(+ gzip)    │ │ NNNNNN.snap│ │ .sha256  │ │  sweep     │
//!   └────────────┘ └────────────┘ └──────────┘ └────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod memtable;
pub mod snapshot;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SnapKvError};
pub use config::{Config, LoadMode};
pub use snapshot::{Compression, SnapshotSummary};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SnapKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
