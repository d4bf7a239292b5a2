//! Track record and track collection encoding

use crate::error::{Result, StoreError};
use crate::model::Track;
use serde::Deserialize;
use serde_json::Value;

const SOURCE_FIELD: &str = "source";
const LEGACY_SOURCE_FIELD: &str = "uri";

/// What to do with a track record that fails to decode inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Drop the bad entry, keep the rest
    #[default]
    Skip,

    /// Fail the whole load with the first bad entry
    Abort,
}

/// A record dropped under [`DecodePolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the entry in the stored array (0-based)
    pub position: usize,

    /// Why it could not be decoded
    pub reason: String,
}

/// Result of decoding a stored track collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTracks {
    pub tracks: Vec<Track>,
    pub skipped: Vec<SkippedRecord>,
}

/// Encode a track as its canonical three-field record
pub fn encode_track(track: &Track) -> Result<Value> {
    serde_json::to_value(track).map_err(|e| StoreError::malformed(e.to_string()))
}

/// Decode a track record
///
/// `source` and `displayName` are required strings; `loop` defaults to false.
/// Records from older stores name the source `uri`; that field is read only
/// when `source` is absent.
pub fn decode_track(record: &Value) -> Result<Track> {
    let Some(fields) = record.as_object() else {
        return Err(StoreError::malformed(format!(
            "expected an object, found {}",
            value_kind(record)
        )));
    };

    let result = match fields.get(LEGACY_SOURCE_FIELD) {
        Some(uri) if !fields.contains_key(SOURCE_FIELD) => {
            let mut fields = fields.clone();
            fields.insert(SOURCE_FIELD.to_string(), uri.clone());
            Track::deserialize(&Value::Object(fields))
        }
        _ => Track::deserialize(record),
    };
    result.map_err(|e| StoreError::malformed(e.to_string()))
}

/// Encode tracks, in order, as a JSON array document
pub fn encode_tracks(tracks: &[Track]) -> Result<String> {
    serde_json::to_string(tracks).map_err(|e| StoreError::malformed(e.to_string()))
}

/// Decode a JSON array document stored under `key`
pub fn decode_tracks(key: &str, text: &str, policy: DecodePolicy) -> Result<DecodedTracks> {
    let records: Vec<Value> =
        serde_json::from_str(text).map_err(|e| StoreError::CorruptCollection {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    let mut decoded = DecodedTracks {
        tracks: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };

    for (position, record) in records.iter().enumerate() {
        match decode_track(record) {
            Ok(track) => decoded.tracks.push(track),
            Err(StoreError::MalformedRecord { reason }) => match policy {
                DecodePolicy::Abort => {
                    return Err(StoreError::malformed(format!(
                        "{} entry {}: {}",
                        key, position, reason
                    )));
                }
                DecodePolicy::Skip => {
                    log::warn!("Skipping track record {} of {:?}: {}", position, key, reason);
                    decoded.skipped.push(SkippedRecord { position, reason });
                }
            },
            Err(e) => return Err(e),
        }
    }

    Ok(decoded)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn howl() -> Track {
        Track::new("content://audio/1", "Howl").with_loop(true)
    }

    #[test]
    fn test_encode_has_exactly_three_fields() {
        let record = encode_track(&howl()).unwrap();
        let obj = record.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["source"], "content://audio/1");
        assert_eq!(obj["displayName"], "Howl");
        assert_eq!(obj["loop"], true);
    }

    #[test]
    fn test_track_roundtrip() {
        for track in [
            howl(),
            Track::new("", ""),
            Track::new("file:///a%7Cb.ogg", "a|b \"quoted\" ✝"),
        ] {
            assert_eq!(decode_track(&encode_track(&track).unwrap()).unwrap(), track);
        }
    }

    #[test]
    fn test_missing_loop_defaults_to_false() {
        let track = decode_track(&json!({"source": "a", "displayName": "Howl"})).unwrap();
        assert!(!track.looping);
    }

    #[test]
    fn test_legacy_uri_field_and_lenient_loop() {
        let track =
            decode_track(&json!({"uri": "a", "displayName": "Howl", "loop": "true"})).unwrap();
        assert_eq!(track.source, "a");
        assert!(track.looping);

        let track = decode_track(&json!({"source": "a", "displayName": "x", "loop": 1})).unwrap();
        assert!(!track.looping);
    }

    #[test]
    fn test_extra_uri_field_is_ignored() {
        let track = decode_track(&json!({
            "source": "content://audio/1",
            "uri": "content://audio/old",
            "displayName": "Howl",
        }))
        .unwrap();
        assert_eq!(track.source, "content://audio/1");

        let err = decode_track(&json!({"uri": 3, "displayName": "Howl"})).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { .. }));
    }

    #[test]
    fn test_missing_or_mistyped_required_fields() {
        let cases = [
            json!({"displayName": "Howl"}),
            json!({"source": "a"}),
            json!({"source": 7, "displayName": "Howl"}),
            json!({"source": "a", "displayName": null}),
            json!("just a string"),
            json!([1, 2]),
        ];
        for record in cases {
            match decode_track(&record) {
                Err(StoreError::MalformedRecord { .. }) => {}
                other => panic!("expected MalformedRecord for {}, got {:?}", record, other),
            }
        }
    }

    #[test]
    fn test_collection_skip_policy() {
        let text = r#"[
            {"source": "a", "displayName": "Howl", "loop": true},
            {"displayName": "no source"},
            {"source": "b", "displayName": "Creak"}
        ]"#;
        let decoded = decode_tracks("playlist/x", text, DecodePolicy::Skip).unwrap();
        assert_eq!(decoded.tracks.len(), 2);
        assert_eq!(decoded.tracks[1].source, "b");
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].position, 1);
    }

    #[test]
    fn test_collection_abort_policy() {
        let text = r#"[{"source": "a", "displayName": "Howl"}, {"source": "b"}]"#;
        let err = decode_tracks("playlist/x", text, DecodePolicy::Abort).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { .. }));
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_collection_not_an_array() {
        let err = decode_tracks("playlist/x", "{oops", DecodePolicy::Skip).unwrap_err();
        match err {
            StoreError::CorruptCollection { key, .. } => assert_eq!(key, "playlist/x"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_collection_preserves_order() {
        let tracks: Vec<Track> = (0..5)
            .map(|i| Track::new(format!("s{}", i), format!("n{}", i)).with_loop(i % 2 == 0))
            .collect();
        let text = encode_tracks(&tracks).unwrap();
        let decoded = decode_tracks("k", &text, DecodePolicy::Skip).unwrap();
        assert_eq!(decoded.tracks, tracks);
        assert!(decoded.skipped.is_empty());
    }
}
