//! Next/previous track selection
//!
//! Pure index arithmetic over a queue of `len` tracks. Shuffle never
//! reorders the queue; it only replaces the sequential step with a random
//! draw, and only when moving forward.

use crate::types::RepeatMode;
use rand::Rng;

/// Index to play after `current`
///
/// - Shuffle: uniform draw from `[0, len)`. The current index can come up
///   again unless `avoid_current` is set and there is another track.
/// - Sequential: `current + 1`; past the end wraps to 0 on `RepeatMode::All`
///   and otherwise stays on the last track.
///
/// `len` must be non-zero.
pub fn next_index<R: Rng + ?Sized>(
    current: usize,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    avoid_current: bool,
    rng: &mut R,
) -> usize {
    debug_assert!(len > 0, "selection over an empty queue");

    if shuffle {
        return if avoid_current && len > 1 && current < len {
            // Draw from the other len - 1 slots, skipping over `current`
            let pick = rng.gen_range(0..len - 1);
            if pick >= current {
                pick + 1
            } else {
                pick
            }
        } else {
            rng.gen_range(0..len)
        };
    }

    let candidate = current + 1;
    if candidate >= len {
        if repeat == RepeatMode::All {
            0
        } else {
            len - 1
        }
    } else {
        candidate
    }
}

/// Index to play before `current`
///
/// Always sequential, shuffle does not apply. Before the start wraps to the
/// last track on `RepeatMode::All` and otherwise stays on 0.
pub fn previous_index(current: usize, len: usize, repeat: RepeatMode) -> usize {
    debug_assert!(len > 0, "selection over an empty queue");

    match current.checked_sub(1) {
        Some(candidate) => candidate.min(len - 1),
        None if repeat == RepeatMode::All => len - 1,
        None => 0,
    }
}
