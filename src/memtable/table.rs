//! MemTable implementation
//!
//! HashMap-backed table of byte-string keys and values.

use std::collections::hash_map;
use std::collections::HashMap;

/// In-memory table of live entries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemTable {
    data: HashMap<Vec<u8>, Vec<u8>>,
    /// Sum of key and value lengths currently stored
    size: usize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.data.get(key).map(|v| v.as_slice())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    /// Insert or replace a key-value pair
    ///
    /// Returns the new approximate size in bytes.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> usize {
        let key_len = key.len();
        let value_len = value.len();
        match self.data.insert(key, value) {
            // Key bytes were already counted; only the value changes.
            Some(old) => self.size = self.size - old.len() + value_len,
            None => self.size += key_len + value_len,
        }
        self.size
    }

    /// Remove a key, returning its value if it was present
    pub fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        let old = self.data.remove(key)?;
        self.size -= key.len() + old.len();
        Some(old)
    }

    /// Get approximate size in bytes (keys + values)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get entry count
    pub fn entry_count(&self) -> usize {
        self.data.len()
    }

    /// Check if the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over keys, in no particular order
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.data.keys(),
        }
    }

    /// Iterate over key-value pairs, in no particular order
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.data.iter(),
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.data.clear();
        self.size = 0;
    }
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for MemTable {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
        let mut table = MemTable::new();
        for (key, value) in iter {
            table.put(key, value);
        }
        table
    }
}

/// Iterator over MemTable keys
pub struct Keys<'a> {
    inner: hash_map::Keys<'a, Vec<u8>, Vec<u8>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|k| k.as_slice())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

/// Iterator over MemTable entries
pub struct Entries<'a> {
    inner: hash_map::Iter<'a, Vec<u8>, Vec<u8>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}
