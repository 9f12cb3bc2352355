//! Edge detection between consecutive confirmed scans.

use log::debug;

use crate::keymap::Coord;
use crate::matrix::{released, Snapshot};

/// Logical state of one key, derived from two consecutive confirmed levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    Pressed,
    Held,
    Released,
}

impl KeyState {
    pub const fn from_levels(prev: bool, curr: bool) -> Self {
        match (prev, curr) {
            (false, false) => KeyState::Idle,
            (false, true) => KeyState::Pressed,
            (true, true) => KeyState::Held,
            (true, false) => KeyState::Released,
        }
    }

    /// The event this state produces, if any. Held keys stay silent whether
    /// or not their descriptor asks for hold.
    pub const fn edge(self) -> Option<Edge> {
        match self {
            KeyState::Pressed => Some(Edge::Down),
            KeyState::Released => Some(Edge::Up),
            KeyState::Idle | KeyState::Held => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Down,
    Up,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub coord: Coord,
    pub edge: Edge,
}

/// Keeps the previous confirmed snapshot and diffs each new one against it.
pub struct EdgeDetector<const C: usize, const R: usize> {
    previous: Snapshot<C, R>,
}

impl<const C: usize, const R: usize> EdgeDetector<C, R> {
    /// Every key starts idle.
    pub const fn new() -> Self {
        Self {
            previous: released(),
        }
    }

    /// Diff `current` against the previous snapshot, then make it the new
    /// previous. Events come out in scan order: column by column, rows within
    /// a column.
    pub fn detect(&mut self, current: &Snapshot<C, R>) -> Transitions<C, R> {
        let previous = core::mem::replace(&mut self.previous, *current);
        Transitions {
            previous,
            current: *current,
            index: 0,
        }
    }

    pub fn previous(&self) -> &Snapshot<C, R> {
        &self.previous
    }
}

impl<const C: usize, const R: usize> Default for EdgeDetector<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Events produced by one [`EdgeDetector::detect`] call.
pub struct Transitions<const C: usize, const R: usize> {
    previous: Snapshot<C, R>,
    current: Snapshot<C, R>,
    index: usize,
}

impl<const C: usize, const R: usize> Iterator for Transitions<C, R> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        while self.index < C * R {
            let coord = Coord::new(self.index / R, self.index % R);
            self.index += 1;

            let state = KeyState::from_levels(
                self.previous[coord.col][coord.row],
                self.current[coord.col][coord.row],
            );
            if let Some(edge) = state.edge() {
                debug!("{coord}: {state:?}");
                return Some(KeyEvent { coord, edge });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events<const C: usize, const R: usize>(
        det: &mut EdgeDetector<C, R>,
        snap: Snapshot<C, R>,
    ) -> Vec<(usize, usize, Edge)> {
        det.detect(&snap)
            .map(|e| (e.coord.col, e.coord.row, e.edge))
            .collect()
    }

    #[test]
    fn state_table() {
        assert_eq!(KeyState::from_levels(false, false), KeyState::Idle);
        assert_eq!(KeyState::from_levels(false, true), KeyState::Pressed);
        assert_eq!(KeyState::from_levels(true, true), KeyState::Held);
        assert_eq!(KeyState::from_levels(true, false), KeyState::Released);

        assert_eq!(KeyState::Pressed.edge(), Some(Edge::Down));
        assert_eq!(KeyState::Released.edge(), Some(Edge::Up));
        assert_eq!(KeyState::Held.edge(), None);
        assert_eq!(KeyState::Idle.edge(), None);
    }

    #[test]
    fn press_hold_release() {
        let mut det = EdgeDetector::<2, 2>::new();
        let pressed = [[false, true], [false, false]];

        assert_eq!(events(&mut det, pressed), vec![(0, 1, Edge::Down)]);
        assert!(events(&mut det, pressed).is_empty());
        assert!(events(&mut det, pressed).is_empty());
        assert_eq!(events(&mut det, released()), vec![(0, 1, Edge::Up)]);
        assert!(events(&mut det, released()).is_empty());
    }

    #[test]
    fn simultaneous_changes_come_out_in_scan_order() {
        let mut det = EdgeDetector::<3, 3>::new();
        let mut snap = released();
        snap[2][2] = true;
        snap[1][0] = true;

        assert_eq!(
            events(&mut det, snap),
            vec![(1, 0, Edge::Down), (2, 2, Edge::Down)]
        );

        snap[1][0] = false;
        snap[0][1] = true;
        assert_eq!(
            events(&mut det, snap),
            vec![(0, 1, Edge::Down), (1, 0, Edge::Up)]
        );
    }

    #[test]
    fn previous_is_overwritten_even_if_events_are_not_consumed() {
        let mut det = EdgeDetector::<1, 2>::new();
        let snap = [[true, true]];

        drop(det.detect(&snap));
        assert_eq!(*det.previous(), snap);
        assert!(events(&mut det, snap).is_empty());
    }
}
