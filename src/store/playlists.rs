//! Named playlist CRUD over a key-value backend

use super::backend::{KeyValueBackend, WriteBatch};
use super::config::StoreConfig;
use super::file::FileBackend;
use crate::codec::{self, DecodePolicy, DecodedTracks};
use crate::error::{Result, StoreError};
use crate::model::{Playlist, Track};
use std::collections::BTreeSet;

/// Key holding the set of known playlist names
pub const INDEX_KEY: &str = "playlist_names";

/// Prefix of every per-playlist key; [`INDEX_KEY`] does not start with it
pub const RECORD_PREFIX: &str = "playlist/";

/// Prefix older stores used for per-playlist keys; read, never written
pub const LEGACY_RECORD_PREFIX: &str = "playlist_";

/// Storage key for the tracks of playlist `name`
pub fn record_key(name: &str) -> String {
    format!("{}{}", RECORD_PREFIX, name)
}

/// Key an older store used for `name`, unless it would be the index key
pub fn legacy_record_key(name: &str) -> Option<String> {
    let key = format!("{}{}", LEGACY_RECORD_PREFIX, name);
    (key != INDEX_KEY).then_some(key)
}

/// Durable store of named playlists
///
/// Construct one per session and hand it to whatever needs it. Every write
/// (`save`, `delete`) touches the playlist key and the index in a single
/// backend commit. Playlists found under legacy keys are moved to the
/// current key by that commit.
#[derive(Debug)]
pub struct PlaylistStore<B: KeyValueBackend> {
    backend: B,
    decode_policy: DecodePolicy,
}

impl PlaylistStore<FileBackend> {
    /// Open a file-backed store described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let backend = FileBackend::open(config.path.clone())?;
        Ok(Self::new(backend).with_decode_policy(config.decode_policy))
    }
}

impl<B: KeyValueBackend> PlaylistStore<B> {
    /// Wrap a backend, skipping malformed entries on load
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            decode_policy: DecodePolicy::Skip,
        }
    }

    /// Set the decode policy
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// All playlist names, sorted ascending
    ///
    /// A missing or empty index means no playlists.
    pub fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.read_index()?.into_iter().collect())
    }

    /// Whether `name` is in the index
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.read_index()?.contains(name))
    }

    /// Save `tracks` under `name`, replacing any previous contents
    ///
    /// The name is stored verbatim; trimming is up to the caller.
    pub fn save(&mut self, name: &str, tracks: &[Track]) -> Result<()> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let mut names = self.read_index()?;
        names.insert(name.to_string());

        let mut batch = WriteBatch::new()
            .put(record_key(name), codec::encode_tracks(tracks)?)
            .put(INDEX_KEY, codec::encode_index(&names));
        if let Some(legacy) = self.stored_legacy_key(name)? {
            log::debug!("Migrating playlist {:?} off legacy key {:?}", name, legacy);
            batch = batch.remove(legacy);
        }
        self.backend.commit(batch)?;

        log::debug!("Saved playlist {:?} ({} tracks)", name, tracks.len());
        Ok(())
    }

    /// Save an in-memory playlist under its own name
    pub fn save_playlist(&mut self, playlist: &Playlist) -> Result<()> {
        self.save(&playlist.name, &playlist.tracks)
    }

    /// Load the tracks of `name`; an unknown name yields an empty list
    pub fn load(&self, name: &str) -> Result<Vec<Track>> {
        Ok(self.load_detailed(name)?.tracks)
    }

    /// Load the tracks of `name` along with any entries that were skipped
    pub fn load_detailed(&self, name: &str) -> Result<DecodedTracks> {
        self.decode_record(name, self.decode_policy)
    }

    /// Load `name` as an in-memory playlist
    pub fn load_playlist(&self, name: &str) -> Result<Playlist> {
        Ok(Playlist::with_tracks(name, self.load(name)?))
    }

    /// Flip the loop flag of one track of a saved playlist and save it back
    ///
    /// Refuses to rewrite a playlist holding unreadable entries, since the
    /// rewrite would drop them. Returns the new flag.
    pub fn toggle_loop(&mut self, name: &str, index: usize) -> Result<bool> {
        if !self.contains(name)? {
            return Err(StoreError::UnknownPlaylist {
                name: name.to_string(),
            });
        }

        let decoded = self.load_detailed(name)?;
        if !decoded.skipped.is_empty() {
            return Err(StoreError::malformed(format!(
                "{} unreadable track record(s) in {:?}, not rewriting it",
                decoded.skipped.len(),
                name
            )));
        }

        let mut playlist = Playlist::with_tracks(name, decoded.tracks);
        let looping = playlist
            .toggle_loop(index)
            .ok_or_else(|| StoreError::TrackOutOfRange {
                name: name.to_string(),
                index,
                len: playlist.len(),
            })?;
        self.save_playlist(&playlist)?;
        Ok(looping)
    }

    /// Remove `name` and its tracks; unknown names are a no-op
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let key = record_key(name);
        let legacy = self.stored_legacy_key(name)?;
        let mut names = self.read_index()?;
        let indexed = names.remove(name);
        let stored = self.backend.get(&key)?.is_some();

        if !indexed && !stored && legacy.is_none() {
            log::debug!("Delete of unknown playlist {:?} ignored", name);
            return Ok(());
        }

        let mut batch = WriteBatch::new()
            .remove(key)
            .put(INDEX_KEY, codec::encode_index(&names));
        if let Some(legacy) = legacy {
            batch = batch.remove(legacy);
        }
        self.backend.commit(batch)?;

        log::debug!("Deleted playlist {:?}", name);
        Ok(())
    }

    pub(crate) fn read_index(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .backend
            .get(INDEX_KEY)?
            .map(|text| codec::decode_index(&text))
            .unwrap_or_default())
    }

    pub(crate) fn write_index(&mut self, names: &BTreeSet<String>) -> Result<()> {
        self.backend
            .commit(WriteBatch::new().put(INDEX_KEY, codec::encode_index(names)))
    }

    /// Names of every playlist that has a stored record, current or legacy, sorted
    pub(crate) fn record_names(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .backend
            .keys()?
            .into_iter()
            .filter(|key| key != INDEX_KEY)
            .filter_map(|key| {
                key.strip_prefix(RECORD_PREFIX)
                    .or_else(|| key.strip_prefix(LEGACY_RECORD_PREFIX))
                    .map(str::to_string)
            })
            .collect())
    }

    /// Decode the stored tracks of `name`, falling back to its legacy key
    pub(crate) fn decode_record(&self, name: &str, policy: DecodePolicy) -> Result<DecodedTracks> {
        let key = record_key(name);
        if let Some(text) = self.backend.get(&key)? {
            return codec::decode_tracks(&key, &text, policy);
        }

        if let Some(legacy) = legacy_record_key(name) {
            if let Some(text) = self.backend.get(&legacy)? {
                log::debug!("Reading playlist {:?} from legacy key {:?}", name, legacy);
                return codec::decode_tracks(&legacy, &text, policy);
            }
        }

        Ok(DecodedTracks::default())
    }

    fn stored_legacy_key(&self, name: &str) -> Result<Option<String>> {
        match legacy_record_key(name) {
            Some(key) if self.backend.get(&key)?.is_some() => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}
