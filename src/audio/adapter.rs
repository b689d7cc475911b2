use std::time::Duration;

use log::{debug, warn};

use crate::player::{PlayerStore, RepeatMode};
use crate::track::Track;

use super::{AudioOutput, OutputEvent};

/// A non-fatal playback problem, kept for the UI to surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackFailure {
    /// The current track has no usable media reference; the load was
    /// skipped.
    InvalidMedia { track_id: String, detail: String },
    /// The output rejected a start request.
    StartRejected { track_id: String, detail: String },
}

/// Where the active track stands, for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Bar fill in `[0, 100]`. Zero whenever the duration is unknown.
    pub percent: f64,
}

impl Progress {
    fn at(position: Duration, duration: Option<Duration>) -> Self {
        let percent = match duration {
            Some(d) if d > Duration::ZERO => {
                (position.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        };
        Self {
            position,
            duration,
            percent,
        }
    }

    fn for_track(track: &Track) -> Self {
        // The catalog duration is only a hint until the output reports the
        // real one.
        let hint = track
            .duration_secs
            .and_then(|s| Duration::try_from_secs_f64(s).ok());
        Self::at(Duration::ZERO, hint)
    }

    /// Elapsed label, `m:ss`.
    pub fn position_label(&self) -> String {
        format_mss(self.position)
    }

    /// Total label, `m:ss`, or `0:00` while the duration is unknown.
    pub fn duration_label(&self) -> String {
        self.duration
            .map(format_mss)
            .unwrap_or_else(|| "0:00".to_string())
    }
}

/// `m:ss` with zero-padded seconds, the format used on both sides of the
/// progress bar.
pub fn format_mss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// The playback surface adapter.
///
/// Owns the output primitive exclusively and drives it toward the
/// controller's desired state. Host loops call [`drive`](Self::drive) after
/// issuing commands and on a periodic tick; everything else here is
/// read-only accessors plus [`seek_to_percent`](Self::seek_to_percent) for
/// scrubbing.
pub struct AudioPlayer {
    output: Box<dyn AudioOutput>,
    /// Id of the track the output was last pointed at (whether or not the
    /// load succeeded).
    loaded: Option<String>,
    /// Whether the output actually holds a playable source.
    has_source: bool,
    /// Stamp for start requests; completions carrying an older stamp are
    /// stale and ignored.
    generation: u64,
    seen_version: Option<u64>,
    last_playing: bool,
    last_volume: Option<f32>,
    progress: Progress,
    failure: Option<PlaybackFailure>,
}

impl AudioPlayer {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            loaded: None,
            has_source: false,
            generation: 0,
            seen_version: None,
            last_playing: false,
            last_volume: None,
            progress: Progress::default(),
            failure: None,
        }
    }

    /// Latest progress report from the output.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// The most recent non-fatal playback problem. Cleared when a track
    /// loads successfully.
    pub fn last_failure(&self) -> Option<&PlaybackFailure> {
        self.failure.as_ref()
    }

    /// One cooperative tick: translate pending output events into
    /// controller commands, then reconcile controller state into the
    /// output.
    ///
    /// Events drain first so that an auto-advance triggered by `Ended` is
    /// reflected by the same tick's reconcile pass.
    pub fn drive(&mut self, store: &mut PlayerStore) {
        for event in self.output.poll_events() {
            self.handle_event(event, store);
        }
        self.sync(store);
    }

    /// User scrubbing: `percent` in `[0, 100]` from the progress bar.
    ///
    /// Translates through the output's duration and seeks the output
    /// directly; the playhead is not controller state. No-op while the
    /// duration is unknown.
    pub fn seek_to_percent(&mut self, percent: f64) {
        let Some(duration) = self.output.duration() else {
            return;
        };
        if duration.is_zero() || !percent.is_finite() {
            return;
        }

        let percent = percent.clamp(0.0, 100.0);
        let target = duration.mul_f64(percent / 100.0);
        match self.output.seek(target) {
            Ok(()) => self.progress = Progress::at(target, Some(duration)),
            Err(e) => warn!("seek to {percent:.1}% failed: {e}"),
        }
    }

    fn handle_event(&mut self, event: OutputEvent, store: &mut PlayerStore) {
        match event {
            OutputEvent::TimeUpdate { position, duration } => {
                self.progress = Progress::at(position, duration);
            }
            OutputEvent::Ended => self.on_ended(store),
            OutputEvent::PlayStarted { generation } => {
                if generation != self.generation {
                    debug!("ignoring stale play completion (gen {generation})");
                    return;
                }
                // The user may have paused while the start was pending; the
                // desired state wins over the settled request.
                if !store.state().is_playing {
                    self.output.pause();
                }
            }
            OutputEvent::PlayFailed { generation, error } => {
                if generation != self.generation {
                    debug!("ignoring stale play failure (gen {generation})");
                    return;
                }
                warn!("playback start rejected: {error}");
                self.failure = Some(PlaybackFailure::StartRejected {
                    track_id: self.loaded.clone().unwrap_or_default(),
                    detail: error,
                });
                store.pause();
            }
        }
    }

    fn on_ended(&mut self, store: &mut PlayerStore) {
        if store.state().repeat == RepeatMode::One {
            // The one place repeat-one acts: restart in place, without
            // going through the controller.
            match self.output.seek(Duration::ZERO) {
                Ok(()) => {
                    self.progress = Progress::at(Duration::ZERO, self.output.duration());
                    self.generation += 1;
                    self.output.request_play(self.generation);
                }
                Err(e) => warn!("repeat-one restart failed: {e}"),
            }
        } else {
            store.next();
        }
    }

    fn sync(&mut self, store: &mut PlayerStore) {
        if self.seen_version == Some(store.version()) {
            return;
        }

        let current = store.current().cloned();
        let is_playing = store.state().is_playing;
        let volume = store.state().effective_volume();

        match current {
            None => {
                if self.loaded.take().is_some() {
                    self.output.stop();
                    self.has_source = false;
                    self.progress = Progress::default();
                }
            }
            Some(track) => {
                if self.loaded.as_deref() != Some(track.id.as_str()) {
                    self.load_track(&track, is_playing, store);
                } else if is_playing != self.last_playing {
                    if !is_playing {
                        self.output.pause();
                    } else if self.has_source {
                        self.generation += 1;
                        self.output.request_play(self.generation);
                    } else {
                        // Explicit play on a track whose load failed:
                        // retry, the media may have become reachable.
                        self.load_track(&track, true, store);
                    }
                }
            }
        }

        if self.last_volume != Some(volume) {
            self.output.set_volume(volume);
            self.last_volume = Some(volume);
        }

        // A load failure above may have paused the store; capture whatever
        // it settled on.
        self.seen_version = Some(store.version());
        self.last_playing = store.state().is_playing;
    }

    fn load_track(&mut self, track: &Track, want_play: bool, store: &mut PlayerStore) {
        self.loaded = Some(track.id.clone());
        self.has_source = false;
        self.progress = Progress::for_track(track);

        if track.url.trim().is_empty() {
            warn!("track {:?} has no media URL; skipping load", track.title);
            self.failure = Some(PlaybackFailure::InvalidMedia {
                track_id: track.id.clone(),
                detail: "missing media URL".to_string(),
            });
            self.output.stop();
            store.pause();
            return;
        }

        match self.output.load(&track.url) {
            Ok(()) => {
                self.failure = None;
                self.has_source = true;
                if want_play {
                    self.generation += 1;
                    self.output.request_play(self.generation);
                }
            }
            Err(e) => {
                warn!("failed to load track {:?}: {e}", track.title);
                self.failure = Some(PlaybackFailure::InvalidMedia {
                    track_id: track.id.clone(),
                    detail: e.to_string(),
                });
                store.pause();
            }
        }
    }
}
