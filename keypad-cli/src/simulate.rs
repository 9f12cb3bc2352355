//! Scripted scans through the real pipeline, on a simulated matrix.
//!
//! A trace lists which switches are closed, cycle by cycle:
//!
//! ```toml
//! [[cycle]]
//! pressed = [[1, 0]]   # (column, row)
//! repeat = 3
//!
//! [[cycle]]
//! pressed = []
//! repeat = 3
//! ```

use anyhow::{bail, Result};
use keypad_core::sim::{NoDelay, SimMatrix};
use keypad_core::{KeySink, KeyboardReport, Keycode, Keypad, COLS, KEYMAP, MATRIX, ROWS};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Trace {
    #[serde(rename = "cycle", default)]
    pub cycles: Vec<Cycle>,
}

#[derive(Debug, Deserialize)]
pub struct Cycle {
    /// Closed switches as (column, row) pairs.
    #[serde(default)]
    pub pressed: Vec<(usize, usize)>,
    /// Number of identical scans.
    #[serde(default = "one")]
    pub repeat: usize,
}

fn one() -> usize {
    1
}

impl Trace {
    pub fn parse(contents: &str) -> Result<Self> {
        let trace: Trace = toml::from_str(contents)?;
        for (i, cycle) in trace.cycles.iter().enumerate() {
            for &(col, row) in &cycle.pressed {
                if col >= COLS || row >= ROWS {
                    bail!("cycle {}: ({col}, {row}) is outside the {COLS}x{ROWS} matrix", i + 1);
                }
            }
        }
        Ok(trace)
    }
}

/// Prints each key action with the report the host would receive after it.
#[derive(Default)]
struct Printer {
    scan: usize,
    report: KeyboardReport,
    lines: Vec<String>,
}

impl KeySink for Printer {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        self.report.send_key(code, is_modifier, is_down);

        let action = if is_down { "down" } else { "up" };
        let kind = if is_modifier { "modifier" } else { "key" };
        let bytes = self
            .report
            .as_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        self.lines.push(format!(
            "scan {:>4}: {action:<4} {kind:<8} {:<5} report [{bytes}]",
            self.scan,
            code.display_name(),
        ));
    }
}

/// Run the trace and return one line per key action.
pub fn run(trace: &Trace) -> Result<Vec<String>> {
    let matrix = SimMatrix::<COLS, ROWS>::new();
    let (cols, rows) = matrix.pins();
    let mut keypad = Keypad::new(KEYMAP, &MATRIX, cols, rows, NoDelay)?;
    let mut printer = Printer::default();

    for cycle in &trace.cycles {
        let mut closed = [[false; ROWS]; COLS];
        for &(col, row) in &cycle.pressed {
            closed[col][row] = true;
        }
        matrix.load(&closed);

        for _ in 0..cycle.repeat {
            printer.scan += 1;
            keypad.tick(&mut printer);
        }
    }

    Ok(printer.lines)
}
