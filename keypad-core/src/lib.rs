//! Matrix scan engine and key event pipeline for a small USB keypad.
//!
//! This crate is `no_std` so it can be used by both the AVR firmware and the
//! native CLI tool. Hardware is reached only through `embedded-hal` pins and
//! delays plus the [`KeySink`] trait for the USB side.
//!
//! One cycle of [`Keypad::tick`]:
//! 1. [`Scanner`] strobes each column and reads the rows into a raw snapshot.
//! 2. [`Debouncer`] accepts a change only after it has been seen on enough
//!    consecutive scans.
//! 3. [`EdgeDetector`] diffs the confirmed snapshot against the previous one.
//! 4. [`dispatch()`] turns each press/release into ordered modifier and key
//!    actions on the sink.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod events;
pub mod keycode;
pub mod keymap;
pub mod keypad;
pub mod matrix;
pub mod report;
pub mod sim;

#[cfg(test)]
mod mock;

pub use config::{ConfigError, MatrixConfig, COLS, KEYMAP, MATRIX, ROWS};
pub use debounce::Debouncer;
pub use dispatch::{dispatch, KeySink};
pub use events::{Edge, EdgeDetector, KeyEvent, KeyState};
pub use keycode::Keycode;
pub use keymap::{Coord, KeyDescriptor, KeyMap, KeymapError};
pub use keypad::Keypad;
pub use matrix::{Scanner, Snapshot};
pub use report::{HostReport, KeyboardReport};
