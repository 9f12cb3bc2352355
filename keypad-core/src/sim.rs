//! A switch matrix made of memory cells instead of copper.
//!
//! The pins behave like the real wiring: a row reads low only while the
//! column of a closed switch on it is driven. Used by the host simulator and
//! the integration tests.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::matrix::{released, Snapshot};

pub struct SimMatrix<const C: usize, const R: usize> {
    closed: Cell<Snapshot<C, R>>,
    driven: Cell<Option<usize>>,
}

impl<const C: usize, const R: usize> SimMatrix<C, R> {
    /// All switches open, no column driven.
    pub const fn new() -> Self {
        Self {
            closed: Cell::new(released()),
            driven: Cell::new(None),
        }
    }

    /// Open or close one switch.
    pub fn set(&self, col: usize, row: usize, closed: bool) {
        let mut state = self.closed.get();
        state[col][row] = closed;
        self.closed.set(state);
    }

    /// Replace every switch state at once.
    pub fn load(&self, state: &Snapshot<C, R>) {
        self.closed.set(*state);
    }

    /// Column currently pulled low, if any.
    pub fn driven(&self) -> Option<usize> {
        self.driven.get()
    }

    pub fn pins(&self) -> ([SimColumn<'_, C, R>; C], [SimRow<'_, C, R>; R]) {
        (
            core::array::from_fn(|col| SimColumn { matrix: self, col }),
            core::array::from_fn(|row| SimRow { matrix: self, row }),
        )
    }
}

impl<const C: usize, const R: usize> Default for SimMatrix<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Column output line.
///
/// # Panics
///
/// Driving a column while another one is still driven panics: on real wiring
/// that lets a pressed key ghost into the other column.
pub struct SimColumn<'a, const C: usize, const R: usize> {
    matrix: &'a SimMatrix<C, R>,
    col: usize,
}

impl<const C: usize, const R: usize> ErrorType for SimColumn<'_, C, R> {
    type Error = Infallible;
}

impl<const C: usize, const R: usize> OutputPin for SimColumn<'_, C, R> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        if let Some(other) = self.matrix.driven.get() {
            assert_eq!(other, self.col, "column {} still driven", other);
        }
        self.matrix.driven.set(Some(self.col));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if self.matrix.driven.get() == Some(self.col) {
            self.matrix.driven.set(None);
        }
        Ok(())
    }
}

/// Row input line with a pull-up.
pub struct SimRow<'a, const C: usize, const R: usize> {
    matrix: &'a SimMatrix<C, R>,
    row: usize,
}

impl<const C: usize, const R: usize> ErrorType for SimRow<'_, C, R> {
    type Error = Infallible;
}

impl<const C: usize, const R: usize> InputPin for SimRow<'_, C, R> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        let closed = self.matrix.closed.get();
        Ok(self
            .matrix
            .driven
            .get()
            .is_some_and(|col| closed[col][self.row]))
    }
}

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
