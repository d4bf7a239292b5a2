use super::Track;

/// A named, ordered collection of tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Playlist name (primary key in the store, compared verbatim)
    pub name: String,

    /// Tracks in playback order
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    /// Create a playlist from an existing track list
    pub fn with_tracks(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
        }
    }

    /// Append a track to the end of the playlist
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove the track at `index`, if any
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Flip the loop flag of the track at `index`
    ///
    /// Returns the new flag, or `None` if the index is out of range.
    pub fn toggle_loop(&mut self, index: usize) -> Option<bool> {
        let track = self.tracks.get_mut(index)?;
        track.set_loop(!track.looping);
        Some(track.looping)
    }

    /// Tracks that are marked to loop
    pub fn looping_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.looping)
    }

    /// Number of tracks in this playlist
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
