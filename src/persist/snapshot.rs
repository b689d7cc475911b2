use serde::{Deserialize, Serialize};

use crate::player::{DEFAULT_VOLUME, PlayerState, RepeatMode};
use crate::track::Track;

/// The serializable slice of [`PlayerState`].
///
/// `is_playing` is intentionally absent: restoring a session must not
/// auto-resume audio. The queue sits last so the TOML form keeps plain
/// values ahead of the track tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: RepeatMode,
    #[serde(default)]
    pub queue: Vec<Track>,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl PlayerSnapshot {
    pub fn capture(state: &PlayerState) -> Self {
        Self {
            queue: state.queue.clone(),
            current_index: state.current_index,
            volume: state.volume,
            muted: state.muted,
            shuffle: state.shuffle,
            repeat: state.repeat,
        }
    }

    /// Rebuild a [`PlayerState`] from the snapshot, sanitizing values that
    /// may have been hand-edited or truncated on disk: the volume is
    /// re-clamped and the index forced back into the restored queue.
    pub fn restore(self) -> PlayerState {
        let current_index = if self.queue.is_empty() {
            None
        } else {
            Some(self.current_index.unwrap_or(0).min(self.queue.len() - 1))
        };

        let volume = if self.volume.is_nan() {
            DEFAULT_VOLUME
        } else {
            self.volume.clamp(0.0, 1.0)
        };

        PlayerState {
            queue: self.queue,
            current_index,
            is_playing: false,
            volume,
            muted: self.muted,
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }
}
