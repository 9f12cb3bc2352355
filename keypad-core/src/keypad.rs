//! The scan loop: scan, debounce, detect edges, dispatch.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::info;

use crate::config::{ConfigError, MatrixConfig};
use crate::debounce::Debouncer;
use crate::dispatch::{dispatch, KeySink};
use crate::events::EdgeDetector;
use crate::keymap::KeyMap;
use crate::matrix::{Scanner, Snapshot};

/// Owns every piece of per-cycle state. Nothing else reads or writes the
/// snapshots, so one `Keypad` per matrix is the whole concurrency story.
pub struct Keypad<O, I, D, const C: usize, const R: usize> {
    scanner: Scanner<O, I, D, C, R>,
    debouncer: Debouncer<C, R>,
    detector: EdgeDetector<C, R>,
    keymap: KeyMap<C, R>,
}

impl<O, I, D, const C: usize, const R: usize> Keypad<O, I, D, C, R>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Validate the configuration and take over the matrix lines.
    ///
    /// Refuses to start with an incomplete key map or bad wiring: the caller
    /// gets the pins back only by not starting at all.
    pub fn new(
        keymap: KeyMap<C, R>,
        config: &MatrixConfig<C, R>,
        columns: [O; C],
        rows: [I; R],
        delay: D,
    ) -> Result<Self, ConfigError> {
        keymap.validate()?;
        config.validate()?;

        info!(
            "keypad {}x{}: settle {} ms, debounce {} scans",
            C, R, config.settle_ms, config.debounce_threshold
        );

        Ok(Self {
            scanner: Scanner::new(columns, rows, delay, config.settle_ms),
            debouncer: Debouncer::new(config.debounce_threshold),
            detector: EdgeDetector::new(),
            keymap,
        })
    }

    /// Run one full cycle against the hardware. Returns how many key events
    /// were dispatched.
    pub fn tick<S: KeySink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let raw = self.scanner.scan();
        self.process(&raw, sink)
    }

    /// Run the cycle on a raw snapshot produced elsewhere.
    pub fn process<S: KeySink + ?Sized>(&mut self, raw: &Snapshot<C, R>, sink: &mut S) -> usize {
        let confirmed = self.debouncer.update(raw);
        let mut sent = 0;

        // One coordinate's whole sequence goes out before the next starts.
        for event in self.detector.detect(confirmed) {
            dispatch(&event, self.keymap.descriptor(event.coord), sink);
            sent += 1;
        }
        sent
    }

    /// Confirmed switch states as of the last cycle.
    pub fn pressed(&self) -> &Snapshot<C, R> {
        self.debouncer.state()
    }

    /// Stop scanning and hand the pins back.
    pub fn release(self) -> ([O; C], [I; R], D) {
        self.scanner.release()
    }
}
