//! rodio-backed implementation of the output port.
//!
//! Decoding happens at load time. Seeking rebuilds the sink with
//! `Source::skip_duration`, which works for the common formats. Position is
//! tracked with a start instant plus the time accumulated before the last
//! pause.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::{AudioOutput, OutputError, OutputEvent};

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Path of the active media, kept for seek rebuilds.
    path: Option<PathBuf>,
    duration: Option<Duration>,
    started_at: Option<Instant>,
    accumulated: Duration,
    paused: bool,
    volume: f32,
    ended_seen: bool,
    events: VecDeque<OutputEvent>,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn new() -> Result<Self, OutputError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| OutputError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. Useful when
        // debugging, noisy inside an app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            path: None,
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
            paused: true,
            volume: 1.0,
            ended_seen: false,
            events: VecDeque::new(),
        })
    }

    /// Build a paused sink for `path` that starts at `start_at`.
    fn build_sink(
        &self,
        path: &Path,
        start_at: Duration,
    ) -> Result<(Sink, Option<Duration>), OutputError> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| OutputError::Decode(e.to_string()))?;
        let duration = source.total_duration();

        // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
        let source = source.skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        Ok((sink, duration))
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

/// Turn a media reference into a local path. Accepts plain paths and
/// `file://` URIs; anything else would need a streaming backend this output
/// does not provide.
fn resolve_media_path(url: &str) -> Result<PathBuf, OutputError> {
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if let Some((scheme, _)) = url.split_once("://") {
        return Err(OutputError::UnsupportedScheme(scheme.to_string()));
    }
    Ok(PathBuf::from(url))
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str) -> Result<(), OutputError> {
        let path = resolve_media_path(url)?;
        let (sink, duration) = self.build_sink(&path, Duration::ZERO)?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(sink);
        self.path = Some(path);
        self.duration = duration;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
        self.ended_seen = false;
        Ok(())
    }

    fn request_play(&mut self, generation: u64) {
        match &self.sink {
            Some(sink) => {
                sink.play();
                self.paused = false;
                if self.started_at.is_none() {
                    self.started_at = Some(Instant::now());
                }
                self.events.push_back(OutputEvent::PlayStarted { generation });
            }
            None => {
                self.events.push_back(OutputEvent::PlayFailed {
                    generation,
                    error: OutputError::NoSource.to_string(),
                });
            }
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(t) = self.started_at.take() {
            self.accumulated += t.elapsed();
        }
        self.paused = true;
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.path = None;
        self.duration = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
        self.ended_seen = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn position(&self) -> Duration {
        self.elapsed()
    }

    fn seek(&mut self, position: Duration) -> Result<(), OutputError> {
        let Some(path) = self.path.clone() else {
            return Err(OutputError::NoSource);
        };
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };

        let (sink, _) = self.build_sink(&path, position)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        if self.paused {
            self.started_at = None;
        } else {
            sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(sink);
        self.accumulated = position;
        self.ended_seen = false;
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_events(&mut self) -> Vec<OutputEvent> {
        if let Some(sink) = &self.sink {
            if !self.paused && sink.empty() && !self.ended_seen {
                // The source drained: natural end of media.
                self.ended_seen = true;
                if let Some(t) = self.started_at.take() {
                    self.accumulated += t.elapsed();
                }
                self.events.push_back(OutputEvent::Ended);
            } else if !self.ended_seen {
                self.events.push_back(OutputEvent::TimeUpdate {
                    position: self.elapsed(),
                    duration: self.duration,
                });
            }
        }
        self.events.drain(..).collect()
    }
}
