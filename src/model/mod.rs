//! Data model for tracks and playlists
//!
//! These types are independent of the storage medium; the codec module
//! defines how they are written to it.

mod playlist;
mod track;

pub use playlist::Playlist;
pub use track::Track;
