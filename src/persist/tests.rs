use std::path::PathBuf;

use crate::player::{PlayerState, PlayerStore, RepeatMode};
use crate::testutil::{EnvGuard, env_lock};
use crate::track::{Author, AuthorRole, Track};

use super::{PlayerSnapshot, StateFile, StateStore, default_state_path, resolve_state_path};

fn sample_track() -> Track {
    Track {
        id: "black-hole-sun".into(),
        title: "Black Hole Sun".into(),
        authors: vec![Author {
            name: "Chris".into(),
            surname: "Cornell".into(),
            role: AuthorRole::Author,
        }],
        url: "file:///music/black-hole-sun.mp3".into(),
        cover_url: Some("https://cdn.musila.app/covers/bhs.webp".into()),
        duration_secs: Some(318.0),
    }
}

fn sample_snapshot() -> PlayerSnapshot {
    PlayerSnapshot {
        queue: vec![sample_track()],
        current_index: Some(0),
        volume: 0.6,
        muted: true,
        shuffle: true,
        repeat: RepeatMode::One,
    }
}

#[test]
fn state_file_round_trips_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = StateFile::new(dir.path().join("player.toml"));

    let snapshot = sample_snapshot();
    file.save(&snapshot).unwrap();

    assert_eq!(file.load().unwrap(), Some(snapshot));
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = StateFile::new(dir.path().join("nested").join("deep").join("player.toml"));

    file.save(&sample_snapshot()).unwrap();
    assert!(file.path().exists());
}

#[test]
fn missing_state_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = StateFile::new(dir.path().join("absent.toml"));

    assert_eq!(file.load().unwrap(), None);
}

#[test]
fn corrupt_state_degrades_to_defaults_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player.toml");
    std::fs::write(&path, "queue = not-even-toml{{{").unwrap();

    let mut file = StateFile::new(&path);
    assert!(file.load().is_err());

    // The store absorbs the error instead of surfacing it.
    let store = PlayerStore::open(Box::new(StateFile::new(&path)));
    assert!(store.state().queue.is_empty());
    assert_eq!(store.state().current_index, None);
}

#[test]
fn restore_sanitizes_out_of_range_values() {
    let mut snapshot = sample_snapshot();
    snapshot.current_index = Some(10);
    snapshot.volume = 7.0;

    let state = snapshot.restore();
    assert_eq!(state.current_index, Some(0));
    assert_eq!(state.volume, 1.0);
    assert!(!state.is_playing);

    let empty = PlayerSnapshot {
        queue: Vec::new(),
        current_index: Some(3),
        ..sample_snapshot()
    };
    assert_eq!(empty.restore().current_index, None);
}

#[test]
fn capture_excludes_play_state_by_construction() {
    let state = PlayerState {
        is_playing: true,
        volume: 0.25,
        ..PlayerState::default()
    };

    let snapshot = PlayerSnapshot::capture(&state);
    assert!(!snapshot.clone().restore().is_playing);
    assert_eq!(snapshot.volume, 0.25);
}

#[test]
fn resolve_state_path_prefers_the_env_override() {
    let _lock = env_lock();
    let _g = EnvGuard::set("MUSILA_STATE_PATH", "/tmp/musila-test-state.toml");

    assert_eq!(
        resolve_state_path(Some(std::path::Path::new("/etc/ignored.toml"))),
        Some(PathBuf::from("/tmp/musila-test-state.toml"))
    );
}

#[test]
fn resolve_state_path_falls_back_to_the_configured_override() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("MUSILA_STATE_PATH");

    assert_eq!(
        resolve_state_path(Some(std::path::Path::new("/data/player.toml"))),
        Some(PathBuf::from("/data/player.toml"))
    );
}

#[test]
fn default_state_path_prefers_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_state_path().unwrap(),
        PathBuf::from("/tmp/xdg-state-home")
            .join("musila")
            .join("player.toml")
    );
}

#[test]
fn default_state_path_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("musila")
            .join("player.toml")
    );
}
