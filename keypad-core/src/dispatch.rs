//! Turning key events into HID key actions.

use log::debug;

use crate::events::{Edge, KeyEvent};
use crate::keycode::Keycode;
use crate::keymap::KeyDescriptor;

/// Sends one HID key action to the host.
pub trait KeySink {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool);
}

impl<S: KeySink + ?Sized> KeySink for &mut S {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        (**self).send_key(code, is_modifier, is_down)
    }
}

/// Send the HID actions for one key event.
///
/// The modifier goes down before the key and comes up after it, so the host
/// always sees the combination and never a bare modifier tap. `hold` does not
/// change the sequence.
pub fn dispatch<S: KeySink + ?Sized>(event: &KeyEvent, desc: &KeyDescriptor, sink: &mut S) {
    debug!("{}: {:?} {}", event.coord, event.edge, desc.key);

    match event.edge {
        Edge::Down => {
            if let Some(modifier) = desc.modifier {
                sink.send_key(modifier, true, true);
            }
            sink.send_key(desc.key, desc.key.is_modifier(), true);
        }
        Edge::Up => {
            sink.send_key(desc.key, desc.key.is_modifier(), false);
            if let Some(modifier) = desc.modifier {
                sink.send_key(modifier, true, false);
            }
        }
    }
}
