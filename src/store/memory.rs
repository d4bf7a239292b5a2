//! In-memory key-value medium

use super::backend::{KeyValueBackend, WriteBatch};
use crate::error::Result;
use std::collections::BTreeMap;

/// Volatile backend, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<()> {
        batch.apply_to(&mut self.entries);
        Ok(())
    }
}
