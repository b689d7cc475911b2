use crate::track::Track;

use super::RepeatMode;

/// Volume for a player that has never been adjusted.
pub const DEFAULT_VOLUME: f32 = 0.8;

/// The full controller state.
///
/// `is_playing` is the *desired* play state; the audio adapter drives the
/// real output toward it and never writes it back except through the
/// defined event translations.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub queue: Vec<Track>,
    /// Selected position in `queue`. `None` exactly when `queue` is empty.
    pub current_index: Option<usize>,
    pub is_playing: bool,
    /// Playback volume in `[0, 1]`. Preserved while muted so unmuting
    /// restores the prior level.
    pub volume: f32,
    pub muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            current_index: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            muted: false,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl PlayerState {
    /// The currently selected track, if any.
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// What the output should actually play at: zero while muted, the
    /// stored level otherwise.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}
