use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A reference to a playable audio resource plus display metadata
///
/// The serialized form is the canonical track record:
/// `{"source": ..., "displayName": ..., "loop": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Opaque, stable identifier (URI) of the audio resource
    pub source: String,

    /// Human-readable label, may be empty
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// Whether the playback engine should loop this track
    #[serde(rename = "loop", default, deserialize_with = "lenient_bool")]
    pub looping: bool,
}

impl Track {
    /// Create a non-looping track
    pub fn new(source: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            display_name: display_name.into(),
            looping: false,
        }
    }

    /// Builder-style loop flag
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Build a track for a local file: a `file://` URI and the file name as label
    pub fn from_path(path: &Path) -> Self {
        let encoded: Vec<String> = path
            .to_string_lossy()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(format!("file://{}", encoded.join("/")), display_name)
    }

    /// Convert a `file://` source back to a path; `None` for other schemes
    pub fn file_path(&self) -> Option<PathBuf> {
        self.source
            .strip_prefix("file://")
            .and_then(|path| urlencoding::decode(path).ok())
            .map(|decoded| PathBuf::from(decoded.into_owned()))
    }

    /// Set the loop flag, the only mutable part of a track
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }
}

/// Accept booleans, plus "true"/"false" strings; anything else reads as false
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}
