use std::path::PathBuf;

use serde::Deserialize;

use crate::player::{DEFAULT_VOLUME, PlayerState, RepeatMode};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musila/config.toml` or
/// `~/.config/musila/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSILA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback: PlaybackSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

/// Starting flags for a player without persisted state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0, 1]`.
    pub volume: f32,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Starting repeat mode.
    pub repeat: RepeatSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: RepeatSetting::Off,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "none", alias = "no-repeat")]
    Off,
    #[serde(alias = "repeat-all", alias = "loop", alias = "loop-all")]
    All,
    #[serde(alias = "repeat-one", alias = "loop-one", alias = "single")]
    One,
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Off => RepeatMode::Off,
            RepeatSetting::All => RepeatMode::All,
            RepeatSetting::One => RepeatMode::One,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the player state file location. The `MUSILA_STATE_PATH`
    /// environment variable still wins over this.
    pub state_file: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { state_file: None }
    }
}

impl Settings {
    /// The [`PlayerState`] a fresh player starts from when no snapshot
    /// exists.
    pub fn initial_state(&self) -> PlayerState {
        PlayerState {
            volume: self.playback.volume.clamp(0.0, 1.0),
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat.into(),
            ..PlayerState::default()
        }
    }
}
