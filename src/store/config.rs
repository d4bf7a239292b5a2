//! Store configuration

use crate::codec::DecodePolicy;
use std::path::PathBuf;

/// Configuration for opening a file-backed playlist store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// JSON document holding the playlist namespace
    /// (e.g. ~/.local/share/spooky-dj/playlists.json)
    pub path: PathBuf,

    /// How entries that fail to decode are handled on load
    pub decode_policy: DecodePolicy,
}

impl StoreConfig {
    /// Create a new store configuration with the default skip policy
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            decode_policy: DecodePolicy::Skip,
        }
    }

    /// Set the decode policy
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }
}
