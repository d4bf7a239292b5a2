//! File-backed key-value medium
//!
//! The whole namespace lives in one JSON object document. Every commit
//! writes a complete new document to a sibling temporary file and renames
//! it into place, so a batch is either fully on disk or not at all.

use super::backend::{KeyValueBackend, WriteBatch};
use crate::error::{Result, StoreError};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Durable backend storing all keys in a single JSON document
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBackend {
    /// Open the document at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StoreError::unavailable(format!("failed to parse store {:?}: {}", path, e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No store at {:?} yet, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::io(format!("failed to read {:?}", path), e)),
        };

        log::debug!("Opened store {:?} ({} keys)", path, entries.len());
        Ok(Self { path, entries })
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io(format!("failed to create directory {:?}", parent), e)
                })?;
            }
        }

        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::unavailable(format!("failed to serialize store: {}", e)))?;

        let tmp_path = temp_path_for(&self.path);
        let mut file = File::create(&tmp_path)
            .map_err(|e| StoreError::io(format!("failed to create {:?}", tmp_path), e))?;
        file.write_all(text.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(format!("failed to write {:?}", tmp_path), e))?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(format!("failed to replace {:?}", self.path), e)
        })
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut next = self.entries.clone();
        batch.apply_to(&mut next);
        self.write_document(&next)?;
        self.entries = next;
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}
