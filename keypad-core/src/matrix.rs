//! Key matrix scanning.
//!
//! Columns are strobed one at a time (active low, everything else idles
//! high) so current can only flow through switches of the driven column.
//! Rows are inputs with pull-ups: a closed switch on the driven column pulls
//! its row low.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::trace;

/// One scan of the matrix, `[column][row]`, `true` = switch closed.
pub type Snapshot<const C: usize, const R: usize> = [[bool; R]; C];

/// Snapshot with every switch open.
pub const fn released<const C: usize, const R: usize>() -> Snapshot<C, R> {
    [[false; R]; C]
}

/// Drives the column lines and samples the row lines.
///
/// Pin errors are ruled out by the `Infallible` bound: a disconnected or
/// stuck line reads as a constant level, never as a failure.
pub struct Scanner<O, I, D, const C: usize, const R: usize> {
    columns: [O; C],
    rows: [I; R],
    delay: D,
    settle_ms: u32,
}

impl<O, I, D, const C: usize, const R: usize> Scanner<O, I, D, C, R>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Take ownership of the matrix lines and park every column inactive.
    pub fn new(mut columns: [O; C], rows: [I; R], delay: D, settle_ms: u32) -> Self {
        for pin in columns.iter_mut() {
            infallible(pin.set_high());
        }
        Self {
            columns,
            rows,
            delay,
            settle_ms,
        }
    }

    /// Strobe every column in turn and read all rows for each.
    pub fn scan(&mut self) -> Snapshot<C, R> {
        let mut snapshot = released();

        for (col, column) in self.columns.iter_mut().enumerate() {
            infallible(column.set_low());
            self.delay.delay_ms(self.settle_ms);

            for (row, input) in self.rows.iter_mut().enumerate() {
                snapshot[col][row] = infallible(input.is_low());
            }

            infallible(column.set_high());
        }

        trace!("raw scan: {:?}", snapshot);
        snapshot
    }

    /// Give the pins and the delay back.
    pub fn release(self) -> ([O; C], [I; R], D) {
        (self.columns, self.rows, self.delay)
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDelay;
    use crate::sim::SimMatrix;

    #[test]
    fn idle_matrix_scans_released() {
        let wiring = SimMatrix::<3, 2>::new();
        let (cols, rows) = wiring.pins();
        let mut scanner = Scanner::new(cols, rows, MockDelay::new(&wiring), 1);

        assert_eq!(scanner.scan(), released::<3, 2>());
    }

    #[test]
    fn closed_switch_lands_in_its_own_cell() {
        let wiring = SimMatrix::<3, 2>::new();
        wiring.set(1, 0, true);
        wiring.set(2, 1, true);
        let (cols, rows) = wiring.pins();
        let mut scanner = Scanner::new(cols, rows, MockDelay::new(&wiring), 1);

        let snap = scanner.scan();
        assert_eq!(snap, [[false, false], [true, false], [false, true]]);
    }

    #[test]
    fn one_column_driven_at_a_time_and_parked_afterwards() {
        let wiring = SimMatrix::<5, 4>::new();
        let (cols, rows) = wiring.pins();
        let mut scanner = Scanner::new(cols, rows, MockDelay::new(&wiring), 1);

        // The simulated column panics if a second one is driven while one is active.
        scanner.scan();
        assert_eq!(wiring.driven(), None);

        let (_, _, delay) = scanner.release();
        assert_eq!(delay.columns(), &[Some(0), Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn settles_before_every_column_read() {
        let wiring = SimMatrix::<5, 4>::new();
        let (cols, rows) = wiring.pins();
        let delay = MockDelay::new(&wiring);
        let mut scanner = Scanner::new(cols, rows, delay, 3);

        scanner.scan();
        scanner.scan();

        let (_, _, delay) = scanner.release();
        assert_eq!(delay.waits(), &[3; 10]);
        assert!(delay.columns().iter().all(Option::is_some));
    }

    #[test]
    fn stuck_line_gives_constant_snapshot() {
        let wiring = SimMatrix::<2, 2>::new();
        wiring.set(0, 1, true);
        let (cols, rows) = wiring.pins();
        let mut scanner = Scanner::new(cols, rows, MockDelay::new(&wiring), 0);

        let first = scanner.scan();
        for _ in 0..5 {
            assert_eq!(scanner.scan(), first);
        }
    }
}
