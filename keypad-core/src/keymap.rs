//! Key descriptors and the static key map.
//!
//! The map is indexed `[column][row]`, matching the order the scanner strobes
//! the matrix. Its array type already guarantees one descriptor per
//! coordinate; [`KeyMap::new`] additionally rejects unpopulated slots and
//! modifier fields that do not hold a modifier. Because `new` is a `const fn`,
//! a bad compiled-in table fails the build instead of the keypad.

use core::fmt;

use thiserror::Error;

use crate::keycode::Keycode;

/// One switch position in the matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub col: usize,
    pub row: usize,
}

impl Coord {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// What a switch sends when it is actuated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyDescriptor {
    /// Primary key code.
    pub key: Keycode,
    /// Modifier pressed before and released after `key`.
    pub modifier: Option<Keycode>,
    /// Keep `key` down for as long as the switch is closed. Repeat is left to
    /// the host's typematic timer; the firmware never re-sends a press.
    pub hold: bool,
}

impl KeyDescriptor {
    /// A plain key: no modifier, one press/release pair per actuation.
    pub const fn key(key: Keycode) -> Self {
        Self {
            key,
            modifier: None,
            hold: false,
        }
    }

    /// A key sent together with a modifier.
    pub const fn with_modifier(key: Keycode, modifier: Keycode) -> Self {
        Self {
            key,
            modifier: Some(modifier),
            hold: false,
        }
    }

    /// A key held down while the switch stays closed (auto-repeat keys).
    pub const fn held(key: Keycode) -> Self {
        Self {
            key,
            modifier: None,
            hold: true,
        }
    }

    /// Placeholder for a slot that has not been assigned.
    pub const fn unpopulated() -> Self {
        Self::key(Keycode::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("no key assigned at {coord}")]
    Unpopulated { coord: Coord },
    #[error("modifier {code:#04x} at {coord} is not a modifier key")]
    NotAModifier { coord: Coord, code: u8 },
}

/// Immutable `C`×`R` table of key descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMap<const C: usize, const R: usize> {
    table: [[KeyDescriptor; R]; C],
}

impl<const C: usize, const R: usize> KeyMap<C, R> {
    /// Build a key map, rejecting unpopulated slots and bad modifiers.
    pub const fn new(table: [[KeyDescriptor; R]; C]) -> Result<Self, KeymapError> {
        match check(&table) {
            Ok(()) => Ok(Self { table }),
            Err(e) => Err(e),
        }
    }

    /// Re-run the construction checks. Called once at boot.
    pub const fn validate(&self) -> Result<(), KeymapError> {
        check(&self.table)
    }

    pub const fn columns(&self) -> usize {
        C
    }

    pub const fn rows(&self) -> usize {
        R
    }

    /// Descriptor for `coord`.
    ///
    /// # Panics
    ///
    /// If `coord` lies outside the matrix.
    pub fn descriptor(&self, coord: Coord) -> &KeyDescriptor {
        &self.table[coord.col][coord.row]
    }

    /// Descriptor for `coord`, or `None` when it lies outside the matrix.
    pub fn get(&self, coord: Coord) -> Option<&KeyDescriptor> {
        self.table.get(coord.col)?.get(coord.row)
    }

    /// All descriptors in scan order: column by column, rows within a column.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &KeyDescriptor)> + '_ {
        self.table.iter().enumerate().flat_map(|(col, keys)| {
            keys.iter()
                .enumerate()
                .map(move |(row, desc)| (Coord::new(col, row), desc))
        })
    }
}

const fn check<const C: usize, const R: usize>(
    table: &[[KeyDescriptor; R]; C],
) -> Result<(), KeymapError> {
    let mut col = 0;
    while col < C {
        let mut row = 0;
        while row < R {
            let desc = &table[col][row];
            let coord = Coord::new(col, row);
            if desc.key as u8 == Keycode::No as u8 {
                return Err(KeymapError::Unpopulated { coord });
            }
            if let Some(modifier) = desc.modifier {
                if !modifier.is_modifier() {
                    return Err(KeymapError::NotAModifier {
                        coord,
                        code: modifier as u8,
                    });
                }
            }
            row += 1;
        }
        col += 1;
    }
    Ok(())
}
