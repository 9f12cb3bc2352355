//! GPIO for the keypad matrix on an ATmega32U4 (Arduino Leonardo pinout).
//!
//! Pins are addressed by their Leonardo digital pin number and mapped to an
//! AVR port bit here. Columns are push-pull outputs idling high; rows are
//! inputs with the internal pull-up enabled.

use core::convert::Infallible;

use avr_device::atmega32u4::Peripherals;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Port {
    B,
    C,
    D,
    E,
    F,
}

/// One port bit.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    port: Port,
    mask: u8,
}

impl Pin {
    const fn new(port: Port, bit: u8) -> Self {
        Self {
            port,
            mask: 1 << bit,
        }
    }

    /// Leonardo digital pin `n` (D0..D23, where D18..D23 are A0..A5).
    pub const fn leonardo(n: u8) -> Option<Self> {
        use Port::*;
        let (port, bit) = match n {
            0 => (D, 2),
            1 => (D, 3),
            2 => (D, 1),
            3 => (D, 0),
            4 => (D, 4),
            5 => (C, 6),
            6 => (D, 7),
            7 => (E, 6),
            8 => (B, 4),
            9 => (B, 5),
            10 => (B, 6),
            11 => (B, 7),
            12 => (D, 6),
            13 => (C, 7),
            14 => (B, 3),
            15 => (B, 1),
            16 => (B, 2),
            17 => (B, 0),
            18 => (F, 7),
            19 => (F, 6),
            20 => (F, 5),
            21 => (F, 4),
            22 => (F, 1),
            23 => (F, 0),
            _ => return None,
        };
        Some(Self::new(port, bit))
    }

    /// Resolve a whole pin table, failing on the first unknown number.
    pub fn leonardo_all<const N: usize>(numbers: &[u8; N]) -> Option<[Pin; N]> {
        let mut pins = [Pin::new(Port::B, 0); N];
        for (pin, &n) in pins.iter_mut().zip(numbers) {
            *pin = Self::leonardo(n)?;
        }
        Some(pins)
    }
}

/// Run `$body` with `$ddr`, `$out` and `$inp` bound to the data direction,
/// output and input registers of `$port`.
macro_rules! with_port {
    ($dp:expr, $port:expr, |$ddr:ident, $out:ident, $inp:ident| $body:expr) => {
        match $port {
            Port::B => {
                let ($ddr, $out, $inp) = (&$dp.PORTB.ddrb, &$dp.PORTB.portb, &$dp.PORTB.pinb);
                $body
            }
            Port::C => {
                let ($ddr, $out, $inp) = (&$dp.PORTC.ddrc, &$dp.PORTC.portc, &$dp.PORTC.pinc);
                $body
            }
            Port::D => {
                let ($ddr, $out, $inp) = (&$dp.PORTD.ddrd, &$dp.PORTD.portd, &$dp.PORTD.pind);
                $body
            }
            Port::E => {
                let ($ddr, $out, $inp) = (&$dp.PORTE.ddre, &$dp.PORTE.porte, &$dp.PORTE.pine);
                $body
            }
            Port::F => {
                let ($ddr, $out, $inp) = (&$dp.PORTF.ddrf, &$dp.PORTF.portf, &$dp.PORTF.pinf);
                $body
            }
        }
    };
}

fn make_output_high(dp: &Peripherals, pin: Pin) {
    with_port!(dp, pin.port, |ddr, out, _inp| {
        out.modify(|r, w| unsafe { w.bits(r.bits() | pin.mask) });
        ddr.modify(|r, w| unsafe { w.bits(r.bits() | pin.mask) });
    })
}

fn make_pull_up_input(dp: &Peripherals, pin: Pin) {
    with_port!(dp, pin.port, |ddr, out, _inp| {
        ddr.modify(|r, w| unsafe { w.bits(r.bits() & !pin.mask) });
        out.modify(|r, w| unsafe { w.bits(r.bits() | pin.mask) });
    })
}

fn write(dp: &Peripherals, pin: Pin, high: bool) {
    with_port!(dp, pin.port, |_ddr, out, _inp| {
        if high {
            out.modify(|r, w| unsafe { w.bits(r.bits() | pin.mask) });
        } else {
            out.modify(|r, w| unsafe { w.bits(r.bits() & !pin.mask) });
        }
    })
}

fn read(dp: &Peripherals, pin: Pin) -> bool {
    with_port!(dp, pin.port, |_ddr, _out, inp| inp.read().bits() & pin.mask != 0)
}

/// Column strobe line.
pub struct Column<'a> {
    dp: &'a Peripherals,
    pin: Pin,
}

impl<'a> Column<'a> {
    /// Configure `pin` as an output, driven high (inactive).
    pub fn new(dp: &'a Peripherals, pin: Pin) -> Self {
        make_output_high(dp, pin);
        Self { dp, pin }
    }
}

impl ErrorType for Column<'_> {
    type Error = Infallible;
}

impl OutputPin for Column<'_> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        write(self.dp, self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        write(self.dp, self.pin, true);
        Ok(())
    }
}

/// Row sense line.
pub struct Row<'a> {
    dp: &'a Peripherals,
    pin: Pin,
}

impl<'a> Row<'a> {
    /// Configure `pin` as an input with pull-up.
    pub fn new(dp: &'a Peripherals, pin: Pin) -> Self {
        make_pull_up_input(dp, pin);
        Self { dp, pin }
    }
}

impl ErrorType for Row<'_> {
    type Error = Infallible;
}

impl InputPin for Row<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(read(self.dp, self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!read(self.dp, self.pin))
    }
}

/// The on-board LED (D13, PC7).
pub struct Led<'a> {
    dp: &'a Peripherals,
    pin: Pin,
}

impl<'a> Led<'a> {
    pub fn new(dp: &'a Peripherals) -> Self {
        let pin = Pin::new(Port::C, 7);
        make_output_high(dp, pin);
        write(dp, pin, false);
        Self { dp, pin }
    }

    pub fn set(&mut self, on: bool) {
        write(self.dp, self.pin, on);
    }
}
