//! Spooky Playlists - durable named playlists of looping sound tracks
//!
//! This library stores ordered track lists under user-chosen names in a
//! key-value medium, with a maintained name index.

pub mod codec;
pub mod error;
pub mod model;
pub mod store;
pub mod validation;

pub use error::{Result, StoreError};
pub use model::{Playlist, Track};
pub use store::{PlaylistStore, StoreConfig};
