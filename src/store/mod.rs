//! Playlist persistence
//!
//! `PlaylistStore` keeps named playlists in a key-value medium. The medium is
//! abstracted by [`KeyValueBackend`]; a JSON file backend and an in-memory
//! backend are provided.

pub mod backend;
pub mod config;
mod file;
mod memory;
mod playlists;

pub use backend::{KeyValueBackend, WriteBatch, WriteOp};
pub use config::StoreConfig;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use playlists::{
    legacy_record_key, record_key, PlaylistStore, INDEX_KEY, LEGACY_RECORD_PREFIX, RECORD_PREFIX,
};
