//! Playlist name index encoding
//!
//! The index is stored as a JSON array of names, so no character is
//! reserved inside a name. Older stores joined names with `|`; that form is
//! still read.

use serde_json::Value;
use std::collections::BTreeSet;

const LEGACY_SEPARATOR: char = '|';

/// Encode the name set as a sorted JSON array
pub fn encode_index(names: &BTreeSet<String>) -> String {
    Value::Array(names.iter().cloned().map(Value::String).collect()).to_string()
}

/// Decode an index value, accepting the legacy `|`-joined form
///
/// Blank entries are dropped. Never fails: JSON that is not an array of
/// strings is logged and read as empty, anything else that is not JSON is
/// treated as the legacy form.
pub fn decode_index(text: &str) -> BTreeSet<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return BTreeSet::new();
    }

    if trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return match serde_json::from_value::<Vec<String>>(value) {
                Ok(names) => names.into_iter().filter(|n| !n.is_empty()).collect(),
                Err(e) => {
                    log::error!("Ignoring corrupt playlist index: {}", e);
                    BTreeSet::new()
                }
            };
        }
    }

    log::warn!("Reading playlist index in legacy '|' format");
    text.split(LEGACY_SEPARATOR)
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string)
        .collect()
}
