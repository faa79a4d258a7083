//! Error types for SnapKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SnapKvError
pub type Result<T> = std::result::Result<T, SnapKvError>;

/// Unified error type for SnapKV operations
#[derive(Debug, Error)]
pub enum SnapKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Store is already closed")]
    AlreadyClosed,

    // -------------------------------------------------------------------------
    // Snapshot Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Too much history requested: {requested} (max {max})")]
    TooMuchHistory { requested: u32, max: u32 },

    #[error("No loadable snapshots found, data was reset")]
    SnapshotNotFound,

    #[error("Snapshot {id:06} failed checksum verification")]
    BadSnapshot { id: u64 },

    #[error("Snapshot identifier space exhausted (max {max})")]
    IdSpaceExhausted { max: u64 },

    // -------------------------------------------------------------------------
    // Frame Errors
    // -------------------------------------------------------------------------
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("Frame size mismatch: declared {declared}, actual {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("Frame field too large: {0} bytes does not fit in a u32 length")]
    FrameTooLarge(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SnapKvError {
    /// True for errors raised while decoding a frame stream
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            SnapKvError::ShortRead { .. } | SnapKvError::SizeMismatch { .. }
        )
    }
}
