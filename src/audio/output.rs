//! The media output port.
//!
//! Modeled as an opaque capability: one active source at a time, start
//! requests that settle asynchronously, and progress/ended notifications
//! drained by the adapter each tick.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("unsupported media scheme: {0}")]
    UnsupportedScheme(String),
    #[error("media open: {0}")]
    Io(#[from] std::io::Error),
    #[error("media decode: {0}")]
    Decode(String),
    #[error("nothing loaded")]
    NoSource,
}

/// Asynchronous notifications from the output.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Periodic progress report for the active source.
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The active source finished playing naturally.
    Ended,
    /// A start request settled successfully. `generation` is the stamp the
    /// request carried; receivers must discard stale stamps.
    PlayStarted { generation: u64 },
    /// A start request was rejected (device gone, decode failure, policy).
    PlayFailed { generation: u64, error: String },
}

/// The real-time media output primitive.
///
/// Start requests may settle long after the next state change arrives;
/// callers must re-check desired state when the completion event shows up
/// rather than trusting whatever was true at request time.
pub trait AudioOutput {
    /// Load `url` as the active source, replacing any previous one. The
    /// output comes up paused at position zero.
    fn load(&mut self, url: &str) -> Result<(), OutputError>;

    /// Ask the output to start playing the active source. Settles later
    /// through [`OutputEvent::PlayStarted`] or [`OutputEvent::PlayFailed`]
    /// carrying `generation`.
    fn request_play(&mut self, generation: u64);

    fn pause(&mut self);

    /// Drop the active source entirely.
    fn stop(&mut self);

    /// Volume in `[0, 1]`, applied to the active and any future source.
    fn set_volume(&mut self, volume: f32);

    fn position(&self) -> Duration;

    /// Jump to `position` in the active source, preserving pause state.
    fn seek(&mut self, position: Duration) -> Result<(), OutputError>;

    /// Duration of the active source, when known.
    fn duration(&self) -> Option<Duration>;

    /// Drain pending events. Called once per drive tick.
    fn poll_events(&mut self) -> Vec<OutputEvent>;
}
