//! Store Module
//!
//! The public face of SnapKV: one MemTable behind one lock, plus snapshot
//! save/load.
//!
//! ## Responsibilities
//! - Serialize every read, write, save and load through a single mutex
//! - Reject every operation once the store is closed
//! - Hand out iteration as point-in-time copies

use std::io::ErrorKind;
use std::path::Path;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{Result, SnapKvError};
use crate::memtable::MemTable;
use crate::snapshot::{self, retention::check_history, SnapshotSummary};

/// Lock-free iterator over copied keys
pub type Keys = std::vec::IntoIter<Vec<u8>>;

/// Lock-free iterator over copied key-value pairs
pub type Entries = std::vec::IntoIter<(Vec<u8>, Vec<u8>)>;

/// An in-process key-value store with on-demand snapshots
///
/// ## Concurrency Model: one global mutex
///
/// - put/get/delete/len, key and entry copies, save and load all take the
///   same lock for their full duration
/// - save and load do synchronous file I/O (including fsync) under the
///   lock, so they block every other operation until they finish
/// - `keys()` and `entries()` copy under the lock and iterate after it is
///   released; dropping the iterator early cannot leave the store locked
pub struct Store {
    /// Store configuration
    config: Config,

    /// Entries and lifecycle flag, guarded together
    inner: Mutex<Inner>,
}

struct Inner {
    table: MemTable,
    closed: bool,
}

impl Store {
    /// Create an empty store with the default config
    pub fn new() -> Self {
        Self::from_parts(Config::default())
    }

    /// Create an empty store with the given config
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    /// Open a store from the newest snapshot in `config.snapshot_dir`
    ///
    /// A missing directory, or one without snapshots, yields an empty
    /// store. Any other failure (corrupt snapshot, I/O) is returned.
    pub fn open(config: Config) -> Result<Self> {
        let store = Self::with_config(config)?;

        match store.restore() {
            Ok(summary) => {
                tracing::info!(id = summary.id, entries = summary.entry_count, "store opened");
            }
            Err(SnapKvError::SnapshotNotFound) => {
                tracing::info!(
                    dir = %store.config.snapshot_dir.display(),
                    "no snapshot found, starting empty"
                );
            }
            Err(SnapKvError::Io(e))
                if e.kind() == ErrorKind::NotFound && !store.config.snapshot_dir.exists() =>
            {
                tracing::info!(
                    dir = %store.config.snapshot_dir.display(),
                    "snapshot directory missing, starting empty"
                );
            }
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    fn from_parts(config: Config) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                table: MemTable::new(),
                closed: false,
            }),
        }
    }

    /// Acquire the store lock, failing if the store is closed
    fn lock_open(&self) -> Result<MutexGuard<'_, Inner>> {
        let guard = self.inner.lock();
        if guard.closed {
            return Err(SnapKvError::AlreadyClosed);
        }
        Ok(guard)
    }

    // =========================================================================
    // Entry Operations
    // =========================================================================

    /// Insert or replace the value for a key
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut inner = self.lock_open()?;
        inner.table.put(key.to_vec(), value.to_vec());
        Ok(())
    }

    /// Get the value for a key
    ///
    /// Returns `KeyNotFound` if the key is absent.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let inner = self.lock_open()?;
        inner
            .table
            .get(key)
            .map(|v| v.to_vec())
            .ok_or(SnapKvError::KeyNotFound)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        Ok(self.lock_open()?.table.contains_key(key))
    }

    /// Remove a key; removing an absent key is not an error
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut inner = self.lock_open()?;
        inner.table.delete(key);
        Ok(())
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<u64> {
        Ok(self.lock_open()?.table.entry_count() as u64)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock_open()?.table.is_empty())
    }

    /// Copy of every key, in no particular order
    pub fn keys(&self) -> Result<Keys> {
        let inner = self.lock_open()?;
        let keys: Vec<Vec<u8>> = inner.table.keys().map(|k| k.to_vec()).collect();
        Ok(keys.into_iter())
    }

    /// Copy of every key-value pair, in no particular order
    pub fn entries(&self) -> Result<Entries> {
        let inner = self.lock_open()?;
        let entries: Vec<(Vec<u8>, Vec<u8>)> = inner
            .table
            .iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();
        Ok(entries.into_iter())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Write a snapshot of every entry into `dir`
    ///
    /// Keeps the new snapshot plus `history_depth` predecessors. A depth
    /// above `MAX_HISTORY` is rejected before the lock is taken.
    pub fn save(&self, dir: impl AsRef<Path>, history_depth: u32) -> Result<SnapshotSummary> {
        check_history(history_depth)?;

        let inner = self.lock_open()?;
        snapshot::save_snapshot(
            &inner.table,
            dir.as_ref(),
            history_depth,
            self.config.compression,
        )
    }

    /// Replace every entry with the newest snapshot in `dir`
    ///
    /// Existing entries are dropped before the snapshot is read, so a
    /// failed load never leaves the old contents behind. See
    /// `snapshot::load_snapshot` for what a failure leaves instead.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<SnapshotSummary> {
        let mut inner = self.lock_open()?;
        snapshot::load_snapshot(
            &mut inner.table,
            dir.as_ref(),
            self.config.compression,
            self.config.load_mode,
        )
    }

    /// Save into the configured directory with the configured depth
    pub fn checkpoint(&self) -> Result<SnapshotSummary> {
        self.save(&self.config.snapshot_dir, self.config.history_depth)
    }

    /// Load from the configured directory
    pub fn restore(&self) -> Result<SnapshotSummary> {
        self.load(&self.config.snapshot_dir)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Drop every entry and refuse all further operations
    ///
    /// Nothing is written to disk; call `save` first to keep the data.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.lock_open()?;
        inner.table.clear();
        inner.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Approximate size of stored keys and values in bytes
    pub fn size_bytes(&self) -> Result<usize> {
        Ok(self.lock_open()?.table.size())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
