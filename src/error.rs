//! Error types for the playlist store

use std::io;
use thiserror::Error;

/// Errors raised by the codec, the key-value backends and the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A single track record lacks a required field or has the wrong type
    #[error("malformed track record: {reason}")]
    MalformedRecord { reason: String },

    /// A playlist value is not a JSON array at all
    #[error("corrupt playlist collection under {key:?}: {reason}")]
    CorruptCollection { key: String, reason: String },

    /// The key-value medium could not be read or written
    #[error("storage unavailable: {reason}")]
    StorageUnavailable {
        reason: String,
        #[source]
        source: Option<io::Error>,
    },

    /// No playlist of that name is indexed
    #[error("no playlist named {name:?}")]
    UnknownPlaylist { name: String },

    /// A track position past the end of a playlist
    #[error("track {index} is out of range for {name:?} ({len} tracks)")]
    TrackOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },

    /// Playlist names must not be empty
    #[error("playlist name must not be empty")]
    EmptyName,
}

impl StoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        StoreError::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(reason: impl Into<String>, source: io::Error) -> Self {
        StoreError::StorageUnavailable {
            reason: reason.into(),
            source: Some(source),
        }
    }

    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::StorageUnavailable {
            reason: reason.into(),
            source: None,
        }
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, StoreError>;
