use log::warn;
use rand::thread_rng;

use crate::persist::{PlayerSnapshot, StateStore};
use crate::track::Track;

use super::PlayerState;
use super::queue::{next_sequential, prev_sequential, shuffle_pick};

/// Observer invoked synchronously after every state change.
pub type Subscriber = Box<dyn FnMut(&PlayerState)>;

/// The playback queue controller.
///
/// Owns the [`PlayerState`] and mutates it only through the commands below.
/// Commands never panic and never return errors: empty queues and boundary
/// positions degrade to no-ops or saturate. Every command that changes
/// state bumps the version counter, saves a snapshot through the
/// persistence port and notifies subscribers before returning.
pub struct PlayerStore {
    state: PlayerState,
    port: Box<dyn StateStore>,
    subscribers: Vec<Subscriber>,
    version: u64,
}

impl PlayerStore {
    /// Fresh store with default state. Nothing is read from the port until
    /// the first change is written through it.
    pub fn new(port: Box<dyn StateStore>) -> Self {
        Self {
            state: PlayerState::default(),
            port,
            subscribers: Vec::new(),
            version: 0,
        }
    }

    /// Store hydrated from the port's snapshot when one exists.
    pub fn open(port: Box<dyn StateStore>) -> Self {
        Self::open_with(port, PlayerState::default())
    }

    /// Store hydrated from the port's snapshot, falling back to `defaults`
    /// when nothing was saved yet or the saved state is unreadable. Play
    /// state never survives hydration: a reload must not auto-resume audio.
    pub fn open_with(mut port: Box<dyn StateStore>, defaults: PlayerState) -> Self {
        let state = match port.load() {
            Ok(Some(snapshot)) => snapshot.restore(),
            Ok(None) => defaults,
            Err(e) => {
                warn!("discarding unreadable player state: {e}");
                defaults
            }
        };

        Self {
            state,
            port,
            subscribers: Vec::new(),
            version: 0,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// The currently selected track, if any.
    pub fn current(&self) -> Option<&Track> {
        self.state.current()
    }

    /// Monotonic change counter, bumped once per state-changing command.
    /// Pollers compare it instead of diffing the whole state.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register an observer called synchronously after every change.
    pub fn subscribe(&mut self, f: impl FnMut(&PlayerState) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Replace the queue wholesale. `start_index` is clamped into range; an
    /// empty queue selects nothing. Setting a non-empty queue starts
    /// playback.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.state.current_index = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        self.state.is_playing = self.state.current_index.is_some();
        self.state.queue = tracks;
        self.commit();
    }

    /// Play `track` now. An explicit `queue` replaces the current one;
    /// otherwise the existing queue is kept (or becomes `[track]` when
    /// empty). Ids not present in the queue are prepended, so playing one
    /// extra song never discards the surrounding list context.
    pub fn play_track(&mut self, track: Track, queue: Option<Vec<Track>>) {
        let mut new_queue = match queue {
            Some(q) => q,
            None if self.state.queue.is_empty() => vec![track.clone()],
            None => std::mem::take(&mut self.state.queue),
        };

        let index = match new_queue.iter().position(|t| t.id == track.id) {
            Some(i) => i,
            None => {
                new_queue.insert(0, track);
                0
            }
        };

        self.state.queue = new_queue;
        self.state.current_index = Some(index);
        self.state.is_playing = true;
        self.commit();
    }

    pub fn toggle_play(&mut self) {
        if self.state.current_index.is_none() {
            return;
        }
        self.state.is_playing = !self.state.is_playing;
        self.commit();
    }

    pub fn play(&mut self) {
        if self.state.current_index.is_none() || self.state.is_playing {
            return;
        }
        self.state.is_playing = true;
        self.commit();
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        self.commit();
    }

    /// Advance to the next track.
    ///
    /// Shuffle picks a random different index (single-track queues stay
    /// put). Sequentially, the last track wraps to the first only under
    /// `RepeatMode::All`; otherwise the position holds and playback stops.
    /// Repeat-one never affects an explicit skip.
    pub fn next(&mut self) {
        let Some(current) = self.state.current_index else {
            return;
        };
        let len = self.state.queue.len();

        if self.state.shuffle {
            self.state.current_index = Some(shuffle_pick(len, current, &mut thread_rng()));
            self.state.is_playing = true;
            self.commit();
        } else {
            match next_sequential(len, current, self.state.repeat) {
                Some(idx) => {
                    self.state.current_index = Some(idx);
                    self.state.is_playing = true;
                    self.commit();
                }
                None => {
                    // End of queue: hold position, stop playing.
                    if self.state.is_playing {
                        self.state.is_playing = false;
                        self.commit();
                    }
                }
            }
        }
    }

    /// Step back to the previous track. Symmetric to [`next`](Self::next),
    /// except that index 0 without wrap repeat changes nothing at all.
    pub fn prev(&mut self) {
        let Some(current) = self.state.current_index else {
            return;
        };
        let len = self.state.queue.len();

        if self.state.shuffle {
            self.state.current_index = Some(shuffle_pick(len, current, &mut thread_rng()));
            self.state.is_playing = true;
            self.commit();
        } else if let Some(idx) = prev_sequential(len, current, self.state.repeat) {
            self.state.current_index = Some(idx);
            self.state.is_playing = true;
            self.commit();
        }
    }

    /// Flip shuffle. The current position is untouched; only future
    /// next/prev picks change.
    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        self.commit();
    }

    /// Advance the repeat button through `Off -> All -> One -> Off`.
    pub fn cycle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.cycled();
        self.commit();
    }

    /// Set the volume, clamped to `[0, 1]`. Mute is never touched: dragging
    /// the slider to zero is not the same as muting.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.state.volume = volume.clamp(0.0, 1.0);
        self.commit();
    }

    /// Flip mute without touching the stored volume.
    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.commit();
    }

    fn commit(&mut self) {
        self.version = self.version.wrapping_add(1);
        if let Err(e) = self.port.save(&PlayerSnapshot::capture(&self.state)) {
            warn!("failed to persist player state: {e}");
        }
        for sub in &mut self.subscribers {
            sub(&self.state);
        }
    }
}

impl std::fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStore")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
