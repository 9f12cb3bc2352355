//! End-to-end runs of the reference keypad over a simulated matrix.

use keypad_core::sim::{NoDelay, SimMatrix};
use keypad_core::{Keycode, KeyboardReport, KeySink, Keypad, COLS, KEYMAP, MATRIX, ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    ModDown(Keycode),
    ModUp(Keycode),
    Down(Keycode),
    Up(Keycode),
}

#[derive(Default)]
struct Log(Vec<Call>);

impl KeySink for Log {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        self.0.push(match (is_modifier, is_down) {
            (true, true) => Call::ModDown(code),
            (true, false) => Call::ModUp(code),
            (false, true) => Call::Down(code),
            (false, false) => Call::Up(code),
        });
    }
}

/// Run `cycles` scans, returning only the calls they produced.
fn run<O, I, D>(
    keypad: &mut Keypad<O, I, D, COLS, ROWS>,
    cycles: usize,
) -> Vec<Call>
where
    O: embedded_hal::digital::OutputPin<Error = core::convert::Infallible>,
    I: embedded_hal::digital::InputPin<Error = core::convert::Infallible>,
    D: embedded_hal::delay::DelayNs,
{
    let mut log = Log::default();
    for _ in 0..cycles {
        keypad.tick(&mut log);
    }
    log.0
}

#[test]
fn press_hold_release_of_plain_key() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();

    matrix.set(1, 0, true);
    assert_eq!(run(&mut keypad, 3), vec![Call::Down(Keycode::E)]);

    assert!(run(&mut keypad, 10).is_empty());

    matrix.set(1, 0, false);
    assert_eq!(run(&mut keypad, 3), vec![Call::Up(Keycode::E)]);
}

#[test]
fn two_keys_closing_together_do_not_interleave() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();

    matrix.set(1, 0, true);
    matrix.set(2, 2, true);
    assert_eq!(
        run(&mut keypad, 2),
        vec![
            Call::Down(Keycode::E),
            Call::ModDown(Keycode::LAlt),
            Call::Down(Keycode::K),
        ]
    );

    matrix.set(1, 0, false);
    matrix.set(2, 2, false);
    assert_eq!(
        run(&mut keypad, 2),
        vec![
            Call::Up(Keycode::E),
            Call::Up(Keycode::K),
            Call::ModUp(Keycode::LAlt),
        ]
    );
}

#[test]
fn bounce_shorter_than_threshold_is_silent() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();
    let mut log = Log::default();

    for _ in 0..5 {
        matrix.set(4, 3, true);
        keypad.tick(&mut log);
        matrix.set(4, 3, false);
        keypad.tick(&mut log);
    }

    assert!(log.0.is_empty());
}

#[test]
fn bouncy_press_fires_once_after_settling() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();
    let mut log = Log::default();

    for closed in [true, false, true, false, true, true, true, true] {
        matrix.set(2, 0, closed);
        keypad.tick(&mut log);
    }

    assert_eq!(
        log.0,
        vec![Call::ModDown(Keycode::LShift), Call::Down(Keycode::I)]
    );
}

#[test]
fn held_arrow_is_pressed_once_and_left_down() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();
    let mut report = KeyboardReport::empty();

    matrix.set(0, 0, true);
    for _ in 0..50 {
        keypad.tick(&mut report);
    }
    assert_eq!(report.keys[0], Keycode::Left.code());

    matrix.set(0, 0, false);
    for _ in 0..2 {
        keypad.tick(&mut report);
    }
    assert!(report.is_empty());
}

#[test]
fn report_tracks_modifier_combination() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();
    let mut report = KeyboardReport::empty();

    matrix.set(3, 2, true);
    keypad.tick(&mut report);
    keypad.tick(&mut report);

    assert_eq!(
        report.as_bytes(),
        [Keycode::LAlt.modifier_bit(), 0, Keycode::O.code(), 0, 0, 0, 0, 0]
    );
}

#[test]
fn alt_keys_released_one_at_a_time_keep_alt_for_the_other() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();
    let mut report = KeyboardReport::empty();
    let alt = Keycode::LAlt.modifier_bit();

    // g + Alt and k + Alt
    matrix.set(1, 2, true);
    matrix.set(2, 2, true);
    for _ in 0..3 {
        keypad.tick(&mut report);
    }
    assert_eq!(
        report.as_bytes(),
        [alt, 0, Keycode::G.code(), Keycode::K.code(), 0, 0, 0, 0]
    );

    matrix.set(1, 2, false);
    for _ in 0..3 {
        keypad.tick(&mut report);
    }
    assert_eq!(report.as_bytes(), [alt, 0, Keycode::K.code(), 0, 0, 0, 0, 0]);

    matrix.set(2, 2, false);
    for _ in 0..3 {
        keypad.tick(&mut report);
    }
    assert!(report.is_empty());
}

#[test]
fn every_reference_key_fires_exactly_once() {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay).unwrap();

    for (coord, desc) in KEYMAP.iter() {
        matrix.set(coord.col, coord.row, true);
        let pressed = run(&mut keypad, 4);
        matrix.set(coord.col, coord.row, false);
        let released = run(&mut keypad, 4);

        let primary_downs = pressed.iter().filter(|c| **c == Call::Down(desc.key)).count();
        let primary_ups = released.iter().filter(|c| **c == Call::Up(desc.key)).count();
        assert_eq!(primary_downs, 1, "press at {coord}");
        assert_eq!(primary_ups, 1, "release at {coord}");
    }
}
