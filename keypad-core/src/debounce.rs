//! Per-key debounce logic.
//!
//! Each key has a counter that must reach the threshold of consecutive
//! readings that disagree with the confirmed state before the confirmed state
//! changes. A single agreeing reading resets the counter, so a flip that does
//! not last long enough never reaches the edge detector.

use log::debug;

use crate::keymap::Coord;
use crate::matrix::{released, Snapshot};

pub struct Debouncer<const C: usize, const R: usize> {
    /// Confirmed key states: false = released, true = pressed.
    state: Snapshot<C, R>,
    /// Per-key counters tracking consecutive raw readings that differ from the confirmed state.
    counters: [[u8; R]; C],
    threshold: u8,
}

impl<const C: usize, const R: usize> Debouncer<C, R> {
    /// All keys start released.
    pub const fn new(threshold: u8) -> Self {
        Self {
            state: released(),
            counters: [[0; R]; C],
            threshold,
        }
    }

    /// Feed one raw scan and return the confirmed matrix.
    pub fn update(&mut self, raw: &Snapshot<C, R>) -> &Snapshot<C, R> {
        for col in 0..C {
            for row in 0..R {
                let pressed = raw[col][row];
                let counter = &mut self.counters[col][row];

                if pressed == self.state[col][row] {
                    // Raw matches confirmed state, reset counter
                    *counter = 0;
                    continue;
                }

                *counter = counter.saturating_add(1);
                if *counter >= self.threshold {
                    self.state[col][row] = pressed;
                    *counter = 0;
                    debug!(
                        "{} confirmed {}",
                        Coord::new(col, row),
                        if pressed { "closed" } else { "open" }
                    );
                }
            }
        }

        &self.state
    }

    /// Confirmed matrix as of the last update.
    pub fn state(&self) -> &Snapshot<C, R> {
        &self.state
    }
}
