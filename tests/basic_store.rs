use spooky_playlists::codec::{decode_track, encode_track, DecodePolicy};
use spooky_playlists::store::{record_key, FileBackend, KeyValueBackend, MemoryBackend, WriteBatch};
use spooky_playlists::validation::{check_consistency, repair};
use spooky_playlists::{Playlist, PlaylistStore, StoreConfig, StoreError, Track};
use std::fs;
use tempfile::TempDir;

/// The two tracks from the Halloween example
fn halloween_tracks() -> Vec<Track> {
    vec![
        Track::new("a", "Howl").with_loop(true),
        Track::new("b", "Creak"),
    ]
}

fn memory_store() -> PlaylistStore<MemoryBackend> {
    PlaylistStore::new(MemoryBackend::new())
}

/// Create a file-backed store inside a fresh temp directory
fn file_store() -> (TempDir, StoreConfig, PlaylistStore<FileBackend>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = StoreConfig::new(temp_dir.path().join("spooky/playlists.json"));
    let store = PlaylistStore::open(&config).expect("Failed to open store");
    (temp_dir, config, store)
}

#[test]
fn test_track_roundtrip() {
    for track in halloween_tracks() {
        assert_eq!(decode_track(&encode_track(&track).unwrap()).unwrap(), track);
    }
}

#[test]
fn test_halloween_end_to_end() {
    let mut store = memory_store();

    store.save("Halloween", &halloween_tracks()).unwrap();
    assert_eq!(store.list_names().unwrap(), vec!["Halloween"]);

    let loaded = store.load("Halloween").unwrap();
    assert_eq!(loaded, halloween_tracks());
    assert!(loaded[0].looping);
    assert!(!loaded[1].looping);

    store.delete("Halloween").unwrap();
    assert!(store.list_names().unwrap().is_empty());
    assert!(store.load("Halloween").unwrap().is_empty());
}

#[test]
fn test_save_is_idempotent() {
    let mut once = memory_store();
    once.save("Halloween", &halloween_tracks()).unwrap();

    let mut twice = memory_store();
    twice.save("Halloween", &halloween_tracks()).unwrap();
    twice.save("Halloween", &halloween_tracks()).unwrap();

    let snapshot = |store: &PlaylistStore<MemoryBackend>| {
        let backend = store.backend();
        backend
            .keys()
            .unwrap()
            .into_iter()
            .map(|k| {
                let v = backend.get(&k).unwrap();
                (k, v)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(snapshot(&once), snapshot(&twice));
    assert_eq!(twice.list_names().unwrap(), vec!["Halloween"]);
}

#[test]
fn test_overwrite_replaces_tracks() {
    let mut store = memory_store();
    let a = Track::new("a", "A");
    let b = Track::new("b", "B");
    let c = Track::new("c", "C").with_loop(true);

    store.save("Spooky", &[a, b]).unwrap();
    store.save("Spooky", &[c.clone()]).unwrap();

    assert_eq!(store.load("Spooky").unwrap(), vec![c]);
    assert_eq!(store.list_names().unwrap(), vec!["Spooky"]);
}

#[test]
fn test_missing_playlist_loads_empty() {
    let store = memory_store();
    assert!(store.load("Nonexistent").unwrap().is_empty());
    assert!(store.list_names().unwrap().is_empty());
}

#[test]
fn test_delete_missing_is_noop() {
    let mut store = memory_store();
    store.save("Zombie", &[]).unwrap();

    store.delete("Nonexistent").unwrap();
    assert_eq!(store.list_names().unwrap(), vec!["Zombie"]);
}

#[test]
fn test_names_listed_in_order() {
    let mut store = memory_store();
    store.save("Zombie", &[]).unwrap();
    store.save("Banshee", &[]).unwrap();
    store.save("Mummy", &[]).unwrap();

    assert_eq!(
        store.list_names().unwrap(),
        vec!["Banshee", "Mummy", "Zombie"]
    );
}

#[test]
fn test_separator_characters_in_names() {
    let mut store = memory_store();
    store.save("Trick|Treat", &halloween_tracks()).unwrap();
    store.save("Treat", &[Track::new("t", "T")]).unwrap();

    assert_eq!(store.list_names().unwrap(), vec!["Treat", "Trick|Treat"]);
    assert_eq!(store.load("Trick|Treat").unwrap(), halloween_tracks());

    store.delete("Trick|Treat").unwrap();
    assert_eq!(store.list_names().unwrap(), vec!["Treat"]);
}

#[test]
fn test_legacy_store_is_read_checked_and_migrated() {
    // Keys and values exactly as the Android app's preferences held them
    let (_temp_dir, config, _store) = file_store();
    let mut backend = FileBackend::open(&config.path).unwrap();
    backend
        .commit(
            WriteBatch::new()
                .put("playlist_names", "Halloween")
                .put(
                    "playlist_Halloween",
                    r#"[{"uri":"content://x/1","displayName":"Howl","loop":true},{"uri":"content://x/2","displayName":"Creak","loop":false}]"#,
                ),
        )
        .unwrap();
    let mut store = PlaylistStore::new(backend);

    assert_eq!(store.list_names().unwrap(), vec!["Halloween"]);
    let tracks = store.load("Halloween").unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].source, "content://x/1");
    assert!(tracks[0].looping);
    assert!(!tracks[1].looping);

    let report = repair(&mut store).unwrap();
    assert!(report.is_clean());
    assert_eq!(store.list_names().unwrap(), vec!["Halloween"]);

    store.save("Halloween", &tracks).unwrap();

    let reopened = PlaylistStore::open(&config).unwrap();
    assert_eq!(
        reopened.backend().keys().unwrap(),
        vec![record_key("Halloween"), "playlist_names".to_string()]
    );
    assert_eq!(reopened.load("Halloween").unwrap(), tracks);
}

#[test]
fn test_malformed_entry_is_skipped() {
    let mut backend = MemoryBackend::new();
    backend
        .commit(
            WriteBatch::new()
                .put("playlist_names", r#"["Mixed"]"#)
                .put(
                    record_key("Mixed"),
                    r#"[{"source":"a","displayName":"Howl"},{"source":"b"},{"source":"c","displayName":"Creak"}]"#,
                ),
        )
        .unwrap();
    let store = PlaylistStore::new(backend);

    let decoded = store.load_detailed("Mixed").unwrap();
    assert_eq!(decoded.tracks.len(), 2);
    assert_eq!(decoded.skipped.len(), 1);
    assert_eq!(decoded.skipped[0].position, 1);

    let strict = PlaylistStore::new(store.into_backend()).with_decode_policy(DecodePolicy::Abort);
    assert!(matches!(
        strict.load("Mixed"),
        Err(StoreError::MalformedRecord { .. })
    ));
}

#[test]
fn test_file_store_survives_reopen() {
    let (_temp_dir, config, mut store) = file_store();

    let mut playlist = Playlist::with_tracks("Halloween", halloween_tracks());
    store.save_playlist(&playlist).unwrap();
    store.save("Zombie", &[Track::new("z", "Groan")]).unwrap();
    store.delete("Zombie").unwrap();

    let reopened = PlaylistStore::open(&config).unwrap();
    assert_eq!(reopened.list_names().unwrap(), vec!["Halloween"]);
    assert_eq!(reopened.load_playlist("Halloween").unwrap(), playlist);

    // Toggle a loop in memory and save it back
    let mut store = reopened;
    playlist.toggle_loop(1);
    store.save_playlist(&playlist).unwrap();

    let reopened = PlaylistStore::open(&config).unwrap();
    assert!(reopened.load("Halloween").unwrap()[1].looping);
    assert!(check_consistency(&reopened).unwrap().is_clean());
}

#[test]
fn test_file_store_document_layout() {
    let (_temp_dir, config, mut store) = file_store();
    store.save("Halloween", &halloween_tracks()).unwrap();

    let text = fs::read_to_string(&config.path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["playlist_names"], r#"["Halloween"]"#);

    let tracks: serde_json::Value =
        serde_json::from_str(doc["playlist/Halloween"].as_str().unwrap()).unwrap();
    assert_eq!(tracks[0]["source"], "a");
    assert_eq!(tracks[0]["displayName"], "Howl");
    assert_eq!(tracks[0]["loop"], true);
}

#[test]
fn test_repair_after_partial_write() {
    let (_temp_dir, config, _store) = file_store();

    // Simulate a crash between the two writes of an older, non-atomic writer
    let mut backend = FileBackend::open(&config.path).unwrap();
    backend
        .commit(
            WriteBatch::new()
                .put(record_key("Orphan"), r#"[{"source":"a","displayName":"Howl"}]"#)
                .put("playlist_names", r#"["Ghost"]"#),
        )
        .unwrap();

    let mut store = PlaylistStore::new(backend);
    assert_eq!(store.list_names().unwrap(), vec!["Ghost"]);

    let report = repair(&mut store).unwrap();
    assert_eq!(report.orphan_records, vec!["Orphan"]);
    assert_eq!(report.dangling_names, vec!["Ghost"]);

    let reopened = PlaylistStore::open(&config).unwrap();
    assert_eq!(reopened.list_names().unwrap(), vec!["Orphan"]);
    assert_eq!(reopened.load("Orphan").unwrap().len(), 1);
}
