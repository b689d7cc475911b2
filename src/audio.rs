//! Playback surface: the output port and the adapter that drives it.
//!
//! [`AudioPlayer`] is the only component allowed to touch the output
//! primitive. It pushes the controller's desired state into the output and
//! feeds the output's progress and end-of-media events back into the
//! controller; no other feedback path exists.

mod adapter;
mod output;
mod sink;

pub use adapter::*;
pub use output::*;
pub use sink::*;
