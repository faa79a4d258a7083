//! Configuration for SnapKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SnapKvError};
use crate::snapshot::{Compression, MAX_HISTORY};

/// Main configuration for a SnapKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Directory used by `Store::checkpoint` and `Store::restore`
    /// Internal structure:
    ///   {snapshot_dir}/
    ///     ├── 000001.snap      (frame stream)
    ///     ├── 000001.sha256    (raw SHA-256 of 000001.snap)
    ///     └── ...
    pub snapshot_dir: PathBuf,

    /// Number of prior snapshots kept in addition to the newest one
    pub history_depth: u32,

    /// Byte-stream transform applied around the frame stream on disk
    pub compression: Compression,

    // -------------------------------------------------------------------------
    // Load Configuration
    // -------------------------------------------------------------------------
    /// What a failed load leaves behind in the map
    pub load_mode: LoadMode,
}

/// How frames are applied to the map during a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Apply each frame as soon as it is decoded. A decode error part way
    /// through leaves the map holding the frames read so far.
    #[default]
    Incremental,

    /// Decode into a scratch table and swap it in after a clean end of
    /// stream. A decode error leaves the map empty.
    Atomic,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("./snapkv_data"),
            history_depth: 1,
            compression: Compression::None,
            load_mode: LoadMode::Incremental,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the snapshot engine would reject later
    pub fn validate(&self) -> Result<()> {
        if self.history_depth > MAX_HISTORY {
            return Err(SnapKvError::Config(format!(
                "history_depth {} exceeds maximum of {}",
                self.history_depth, MAX_HISTORY
            )));
        }

        if let Compression::Gzip { level } = self.compression {
            if level > 9 {
                return Err(SnapKvError::Config(format!(
                    "gzip level {} out of range 0..=9",
                    level
                )));
            }
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot directory
    pub fn snapshot_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_dir = path.into();
        self
    }

    /// Set how many prior snapshots to keep
    pub fn history_depth(mut self, depth: u32) -> Self {
        self.config.history_depth = depth;
        self
    }

    /// Set the on-disk compression
    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Set the load mode
    pub fn load_mode(mut self, mode: LoadMode) -> Self {
        self.config.load_mode = mode;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
