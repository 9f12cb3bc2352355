//! Compiled-in configuration: matrix wiring, timing and the reference key map.
//!
//! Pins are numbered the way the board silkscreen numbers them (Arduino
//! Leonardo digital pins). The firmware maps those numbers to AVR ports.

use thiserror::Error;

use crate::keycode::Keycode;
use crate::keymap::{KeyDescriptor, KeyMap, KeymapError};

/// Number of column (strobe) lines.
pub const COLS: usize = 5;
/// Number of row (sense) lines.
pub const ROWS: usize = 4;

/// Smallest debounce threshold that still filters a single-cycle glitch.
pub const MIN_DEBOUNCE_THRESHOLD: u8 = 2;

/// Wiring and timing of the switch matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixConfig<const C: usize, const R: usize> {
    /// Output pin driving each column.
    pub column_pins: [u8; C],
    /// Input pin sensing each row.
    pub row_pins: [u8; R],
    /// Milliseconds to wait after driving a column before reading the rows,
    /// so capacitive coupling from the previous column has decayed.
    pub settle_ms: u32,
    /// Consecutive identical scans required before a switch change is accepted.
    pub debounce_threshold: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid key map: {0}")]
    Keymap(#[from] KeymapError),
    #[error("pin {pin} is assigned more than once")]
    DuplicatePin { pin: u8 },
    #[error("debounce threshold {threshold} is below the minimum of {min}", min = MIN_DEBOUNCE_THRESHOLD)]
    ThresholdTooLow { threshold: u8 },
}

impl<const C: usize, const R: usize> MatrixConfig<C, R> {
    /// Check that no pin is used twice and the debounce threshold is usable.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_threshold < MIN_DEBOUNCE_THRESHOLD {
            return Err(ConfigError::ThresholdTooLow {
                threshold: self.debounce_threshold,
            });
        }

        // Every pin, columns then rows, against every later pin.
        let total = C + R;
        let mut i = 0;
        while i < total {
            let pin = self.pin(i);
            let mut j = i + 1;
            while j < total {
                if self.pin(j) == pin {
                    return Err(ConfigError::DuplicatePin { pin });
                }
                j += 1;
            }
            i += 1;
        }
        Ok(())
    }

    const fn pin(&self, index: usize) -> u8 {
        if index < C {
            self.column_pins[index]
        } else {
            self.row_pins[index - C]
        }
    }
}

/// Reference wiring: columns on D2..D6, rows on D7..D10, 1 ms settle, confirm
/// every change over two scans.
pub const MATRIX: MatrixConfig<COLS, ROWS> = {
    let config = MatrixConfig {
        column_pins: [2, 3, 4, 5, 6],
        row_pins: [7, 8, 9, 10],
        settle_ms: 1,
        debounce_threshold: 2,
    };
    if config.validate().is_err() {
        panic!("reference matrix wiring is invalid");
    }
    config
};

/// Shorthand aliases for readability.
const fn key(k: Keycode) -> KeyDescriptor {
    KeyDescriptor::key(k)
}
const fn held(k: Keycode) -> KeyDescriptor {
    KeyDescriptor::held(k)
}
const fn shift(k: Keycode) -> KeyDescriptor {
    KeyDescriptor::with_modifier(k, Keycode::LShift)
}
const fn alt(k: Keycode) -> KeyDescriptor {
    KeyDescriptor::with_modifier(k, Keycode::LAlt)
}

/// Reference key map, `[column][row]`.
///
/// Column 0 carries the arrow keys; left/right are held so the host's
/// typematic repeat scrolls while the switch stays closed.
pub const KEYMAP: KeyMap<COLS, ROWS> = match KeyMap::new([
    [held(Keycode::Left), held(Keycode::Right), key(Keycode::Up), key(Keycode::Down)],
    [key(Keycode::E), key(Keycode::F), alt(Keycode::G), key(Keycode::H)],
    [shift(Keycode::I), key(Keycode::J), alt(Keycode::K), key(Keycode::L)],
    [shift(Keycode::M), key(Keycode::N), alt(Keycode::O), key(Keycode::P)],
    [shift(Keycode::Q), key(Keycode::R), alt(Keycode::S), key(Keycode::T)],
]) {
    Ok(map) => map,
    Err(_) => panic!("reference key map is incomplete"),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Coord;

    #[test]
    fn reference_configuration_is_valid() {
        assert_eq!(MATRIX.validate(), Ok(()));
        assert_eq!(KEYMAP.validate(), Ok(()));
    }

    #[test]
    fn reference_map_covers_every_coordinate() {
        let populated = KEYMAP.iter().filter(|(_, d)| d.key != Keycode::No).count();
        assert_eq!(populated, COLS * ROWS);
    }

    #[test]
    fn reference_map_matches_wiring() {
        let e = *KEYMAP.descriptor(Coord::new(1, 0));
        assert_eq!(e, KeyDescriptor::key(Keycode::E));

        let k = *KEYMAP.descriptor(Coord::new(2, 2));
        assert_eq!(k.key, Keycode::K);
        assert_eq!(k.modifier, Some(Keycode::LAlt));

        assert!(KEYMAP.descriptor(Coord::new(0, 0)).hold);
        assert!(!KEYMAP.descriptor(Coord::new(0, 2)).hold);
    }

    #[test]
    fn duplicate_pins_are_rejected() {
        let config = MatrixConfig {
            column_pins: [2, 3],
            row_pins: [4, 3],
            settle_ms: 1,
            debounce_threshold: 2,
        };
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin { pin: 3 }));
    }

    #[test]
    fn single_scan_debounce_is_rejected() {
        let config = MatrixConfig {
            debounce_threshold: 1,
            ..MATRIX
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdTooLow { threshold: 1 })
        );
    }
}
