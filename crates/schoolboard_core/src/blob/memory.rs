//! In-process blob store.
//!
//! Backs tests and throwaway sessions. Contents vanish with the value, so a
//! "restart" is simulated by moving the same `MemoryBlobStore` into a new
//! record store.

use super::{BlobResult, BlobStore};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBlobStore {
    blobs: BTreeMap<String, String>,
    writes: u64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates one key; used to stage snapshots in tests.
    pub fn with_blob(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.blobs.insert(key.into(), value.into());
        self
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
