//! Serialized forms of tracks, playlists and the name index
//!
//! Everything written to the key-value medium goes through here, as JSON
//! text produced by `serde_json`.

mod index;
mod record;

pub use index::{decode_index, encode_index};
pub use record::{
    decode_track, decode_tracks, encode_track, encode_tracks, DecodePolicy, DecodedTracks,
    SkippedRecord,
};
