//! Playback engine for the Musila app.
//!
//! Two tightly-coupled pieces:
//!
//! - [`player`]: the queue controller. An ordered queue of [`Track`]s, a
//!   current position and the play/volume/mute/shuffle/repeat flags, mutated
//!   only through the synchronous command surface of [`PlayerStore`].
//! - [`audio`]: the playback surface. [`AudioPlayer`] reconciles controller
//!   state against an [`AudioOutput`] and translates the output's progress
//!   and end-of-media events back into controller commands.
//!
//! Controller state is the single source of truth for *desired* playback;
//! the output primitive is a lagging reflection driven by the adapter.
//! Rendering layers read state through accessors and re-render on change
//! notifications; they never touch the output directly.
//!
//! ```no_run
//! use musila_player::{AudioPlayer, PlayerStore, RodioOutput, StateFile, Track};
//!
//! let port = StateFile::at_default_path().expect("no home directory");
//! let mut store = PlayerStore::open(Box::new(port));
//! let output = RodioOutput::new().expect("no audio output device");
//! let mut player = AudioPlayer::new(Box::new(output));
//!
//! store.set_queue(
//!     vec![Track {
//!         id: "demo".into(),
//!         title: "Demo".into(),
//!         authors: Vec::new(),
//!         url: "/tmp/demo.mp3".into(),
//!         cover_url: None,
//!         duration_secs: None,
//!     }],
//!     0,
//! );
//!
//! // Host event loop: drive after commands and on a periodic tick.
//! player.drive(&mut store);
//! ```

pub mod audio;
pub mod config;
pub mod persist;
pub mod player;
pub mod track;

pub use audio::{
    AudioOutput, AudioPlayer, OutputError, OutputEvent, PlaybackFailure, Progress, RodioOutput,
};
pub use config::Settings;
pub use persist::{MemoryStore, PersistError, PlayerSnapshot, StateFile, StateStore};
pub use player::{PlayerState, PlayerStore, RepeatMode};
pub use track::{Author, AuthorRole, Track};

#[cfg(test)]
pub(crate) mod testutil;
