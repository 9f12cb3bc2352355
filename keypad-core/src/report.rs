//! Boot-protocol keyboard report.

use log::warn;

use crate::dispatch::KeySink;
use crate::keycode::Keycode;

/// Standard USB HID keyboard report (8 bytes).
/// Byte 0: modifier keys bitmask
/// Byte 1: reserved (0x00)
/// Bytes 2-7: up to 6 simultaneous keycodes
///
/// Several switches may share a modifier or a key code, so each modifier bit
/// and key slot counts the closed switches holding it and is only cleared
/// when the last of them opens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub reserved: u8,
    pub keys: [u8; 6],
    modifier_holds: [u8; 8],
    key_holds: [u8; 6],
}

impl KeyboardReport {
    pub const fn empty() -> Self {
        Self {
            modifiers: 0,
            reserved: 0,
            keys: [0; 6],
            modifier_holds: [0; 8],
            key_holds: [0; 6],
        }
    }

    /// Wire layout, as sent on the interrupt endpoint.
    pub fn as_bytes(&self) -> [u8; 8] {
        let mut bytes = [0; 8];
        bytes[0] = self.modifiers;
        bytes[1] = self.reserved;
        bytes[2..].copy_from_slice(&self.keys);
        bytes
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes() == [0; 8]
    }

    fn hold_modifier(&mut self, bit: u8) {
        if bit == 0 {
            return;
        }
        let holds = &mut self.modifier_holds[bit.trailing_zeros() as usize];
        *holds = holds.saturating_add(1);
        self.modifiers |= bit;
    }

    fn drop_modifier(&mut self, bit: u8) {
        if bit == 0 {
            return;
        }
        let holds = &mut self.modifier_holds[bit.trailing_zeros() as usize];
        *holds = holds.saturating_sub(1);
        if *holds == 0 {
            self.modifiers &= !bit;
        }
    }

    fn press(&mut self, code: u8) {
        if let Some(pos) = self.keys.iter().position(|&k| k == code) {
            self.key_holds[pos] = self.key_holds[pos].saturating_add(1);
            return;
        }
        match self.keys.iter().position(|&k| k == 0) {
            Some(pos) => {
                self.keys[pos] = code;
                self.key_holds[pos] = 1;
            }
            // More than six keys: drop the extra one.
            None => warn!("report full, dropping {code:#04x}"),
        }
    }

    fn release(&mut self, code: u8) {
        let Some(pos) = self.keys.iter().position(|&k| k == code) else {
            return;
        };
        self.key_holds[pos] = self.key_holds[pos].saturating_sub(1);
        if self.key_holds[pos] == 0 {
            // Keep the occupied slots contiguous.
            self.keys.copy_within(pos + 1.., pos);
            self.key_holds.copy_within(pos + 1.., pos);
            self.keys[5] = 0;
            self.key_holds[5] = 0;
        }
    }
}

impl KeySink for KeyboardReport {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        match (is_modifier, is_down) {
            (true, true) => self.hold_modifier(code.modifier_bit()),
            (true, false) => self.drop_modifier(code.modifier_bit()),
            (false, true) => self.press(code.code()),
            (false, false) => self.release(code.code()),
        }
    }
}

/// The report a host link is building, plus the bytes the host last
/// accepted. Whatever differs is still owed to the host, so a send that
/// fails is simply retried on the next call to [`HostReport::pending`].
#[derive(Clone, Copy, Debug)]
pub struct HostReport {
    report: KeyboardReport,
    sent: [u8; 8],
}

impl HostReport {
    pub const fn new() -> Self {
        Self {
            report: KeyboardReport::empty(),
            sent: [0; 8],
        }
    }

    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    /// Bytes the host has not seen yet, if any.
    pub fn pending(&self) -> Option<[u8; 8]> {
        let bytes = self.report.as_bytes();
        (bytes != self.sent).then_some(bytes)
    }

    /// Record that the host accepted `bytes`.
    pub fn mark_sent(&mut self, bytes: [u8; 8]) {
        self.sent = bytes;
    }

    /// The host dropped its state (bus reset, reconfiguration); it now
    /// assumes every key is up.
    pub fn host_reset(&mut self) {
        self.sent = [0; 8];
    }
}

impl Default for HostReport {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySink for HostReport {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        self.report.send_key(code, is_modifier, is_down);
    }
}
