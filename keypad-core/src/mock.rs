//! Recording doubles for unit tests.

use embedded_hal::delay::DelayNs;

use crate::dispatch::KeySink;
use crate::keycode::Keycode;
use crate::sim::SimMatrix;

/// Records every settle wait and which column was driven during it.
pub struct MockDelay<'a, const C: usize, const R: usize> {
    matrix: &'a SimMatrix<C, R>,
    waits: Vec<u32>,
    columns: Vec<Option<usize>>,
}

impl<'a, const C: usize, const R: usize> MockDelay<'a, C, R> {
    pub fn new(matrix: &'a SimMatrix<C, R>) -> Self {
        Self {
            matrix,
            waits: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }

    pub fn columns(&self) -> &[Option<usize>] {
        &self.columns
    }
}

impl<const C: usize, const R: usize> DelayNs for MockDelay<'_, C, R> {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
        self.columns.push(self.matrix.driven());
    }
}

/// One captured `send_key` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
    pub code: Keycode,
    pub is_modifier: bool,
    pub is_down: bool,
}

pub fn down(code: Keycode) -> Sent {
    Sent {
        code,
        is_modifier: code.is_modifier(),
        is_down: true,
    }
}

pub fn up(code: Keycode) -> Sent {
    Sent {
        code,
        is_modifier: code.is_modifier(),
        is_down: false,
    }
}

/// Sink that keeps every call in order.
#[derive(Default)]
pub struct Recorder {
    pub sent: Vec<Sent>,
}

impl KeySink for Recorder {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        self.sent.push(Sent {
            code,
            is_modifier,
            is_down,
        });
    }
}
