//! Key-value medium trait and write batches

use crate::error::Result;
use std::collections::BTreeMap;

/// Durable string key-value storage - allows swapping between in-memory and file media
///
/// Values are opaque strings; serialization is the store's job.
pub trait KeyValueBackend {
    /// Read the value under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys currently present
    fn keys(&self) -> Result<Vec<String>>;

    /// Apply every operation in `batch`, or none of them
    fn commit(&mut self, batch: WriteBatch) -> Result<()>;
}

/// A single write inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: String },
    Remove { key: String },
}

/// Ordered set of writes committed together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of `value` under `key`
    pub fn put(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue removal of `key`
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the operations, in order, to a map
    pub fn apply_to(self, entries: &mut BTreeMap<String, String>) {
        for op in self.ops {
            match op {
                WriteOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                WriteOp::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
    }
}
