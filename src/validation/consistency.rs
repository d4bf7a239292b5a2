//! Index/record consistency checking and repair

use crate::codec::{DecodePolicy, SkippedRecord};
use crate::error::{Result, StoreError};
use crate::store::{KeyValueBackend, PlaylistStore};

/// Findings of a consistency check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Playlists with stored tracks but no index entry
    pub orphan_records: Vec<String>,

    /// Index entries with no stored tracks
    pub dangling_names: Vec<String>,

    /// Playlists containing track records that fail to decode
    pub malformed: Vec<(String, Vec<SkippedRecord>)>,

    /// Playlists whose stored value is not a track array at all
    pub corrupt: Vec<String>,
}

impl ConsistencyReport {
    /// True when the index and the records agree
    pub fn is_consistent(&self) -> bool {
        self.orphan_records.is_empty() && self.dangling_names.is_empty()
    }

    /// True when there is nothing to report at all
    pub fn is_clean(&self) -> bool {
        self.is_consistent() && self.malformed.is_empty() && self.corrupt.is_empty()
    }
}

/// Compare the index against the stored records and decode every playlist
pub fn check_consistency<B: KeyValueBackend>(
    store: &PlaylistStore<B>,
) -> Result<ConsistencyReport> {
    let index = store.read_index()?;
    let records = store.record_names()?;

    let mut report = ConsistencyReport {
        orphan_records: records.difference(&index).cloned().collect(),
        dangling_names: index.difference(&records).cloned().collect(),
        ..Default::default()
    };

    for name in &records {
        match store.decode_record(name, DecodePolicy::Skip) {
            Ok(decoded) if !decoded.skipped.is_empty() => {
                report.malformed.push((name.clone(), decoded.skipped));
            }
            Ok(_) => {}
            Err(StoreError::CorruptCollection { .. }) => report.corrupt.push(name.clone()),
            Err(e) => return Err(e),
        }
    }

    log::debug!(
        "Consistency check: {} indexed, {} stored, {} orphan(s), {} dangling",
        index.len(),
        records.len(),
        report.orphan_records.len(),
        report.dangling_names.len()
    );

    Ok(report)
}

/// Bring the index in line with the stored records
///
/// Orphan records are added to the index and dangling names removed, in a
/// single commit. Record contents are left untouched. Returns the report
/// from before the repair.
pub fn repair<B: KeyValueBackend>(store: &mut PlaylistStore<B>) -> Result<ConsistencyReport> {
    let report = check_consistency(store)?;
    if report.is_consistent() {
        return Ok(report);
    }

    let mut index = store.read_index()?;
    for name in &report.dangling_names {
        log::info!("Removing index entry without tracks: {:?}", name);
        index.remove(name);
    }
    for name in &report.orphan_records {
        log::info!("Indexing stored playlist: {:?}", name);
        index.insert(name.clone());
    }
    store.write_index(&index)?;

    Ok(report)
}
