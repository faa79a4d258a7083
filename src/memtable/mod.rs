//! MemTable Module
//!
//! In-memory map holding the live entries of a store.
//!
//! ## Responsibilities
//! - Fast point reads and writes in memory
//! - Key and entry iteration for snapshots
//! - Track entry count and approximate size
//!
//! ## Locking
//! The MemTable has no lock of its own. `Store` wraps it in a single
//! mutex, so every method here takes `&self` or `&mut self` and assumes
//! the caller already has exclusive access.
//!
//! ## Data Structure Choice
//! `HashMap<Vec<u8>, Vec<u8>>`: snapshots do not promise any key order,
//! so there is nothing to gain from a sorted map.

mod table;

pub use table::{Entries, Keys, MemTable};
