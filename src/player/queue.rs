//! Index arithmetic for the playback queue.
//!
//! Pure helpers: given the queue length, the current position and the mode
//! flags, compute where a transport command lands. Kept free of store state
//! so the boundary cases stay testable in isolation.

use rand::Rng;

use super::RepeatMode;

/// Pick a random index in `0..len` different from `current`.
///
/// Samples directly from the remaining indices instead of rejection
/// sampling, so a single-element queue cannot spin: it stays put.
pub(crate) fn shuffle_pick(len: usize, current: usize, rng: &mut impl Rng) -> usize {
    if len <= 1 {
        return current;
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}

/// Where `next` lands without shuffle. `None` means the end of the queue
/// was reached: hold position and stop.
pub(crate) fn next_sequential(len: usize, current: usize, repeat: RepeatMode) -> Option<usize> {
    if current + 1 < len {
        Some(current + 1)
    } else if repeat == RepeatMode::All {
        Some(0)
    } else {
        None
    }
}

/// Where `prev` lands without shuffle. `None` means already at the start:
/// leave everything untouched.
pub(crate) fn prev_sequential(len: usize, current: usize, repeat: RepeatMode) -> Option<usize> {
    if current > 0 {
        Some(current - 1)
    } else if repeat == RepeatMode::All {
        Some(len - 1)
    } else {
        None
    }
}
