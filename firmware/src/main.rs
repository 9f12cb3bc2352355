//! Keypad firmware for the ATmega32U4 (Arduino Leonardo / Pro Micro).
//!
//! - 5×4 switch matrix, one column strobed at a time
//! - Debounced press/release detection from `keypad-core`
//! - USB HID boot keyboard reports
//!
//! Log calls in `keypad-core` are compiled out here (`log/max_level_off`).

#![no_std]
#![no_main]
#![feature(asm_experimental_arch)]

mod delay;
mod pins;
mod usb;

use avr_device::atmega32u4::Peripherals;
use keypad_core::{Keypad, KEYMAP, MATRIX};

use delay::BusyDelay;
use pins::{Column, Led, Pin, Row};
use usb::UsbKeyboard;

/// Panic handler — on AVR we just loop forever.
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Main entry point.
#[no_mangle]
pub extern "C" fn main() -> ! {
    let dp = unsafe { Peripherals::steal() };

    // Disable clock prescaler: run at the full 16 MHz
    dp.CPU.clkpr.write(|w| w.clkpce().set_bit());
    dp.CPU.clkpr.write(|w| unsafe { w.bits(0) });

    let mut led = Led::new(&dp);

    let (Some(column_pins), Some(row_pins)) = (
        Pin::leonardo_all(&MATRIX.column_pins),
        Pin::leonardo_all(&MATRIX.row_pins),
    ) else {
        halt(&mut led);
    };

    let columns = column_pins.map(|pin| Column::new(&dp, pin));
    let rows = row_pins.map(|pin| Row::new(&dp, pin));

    // Refuse to scan with a configuration that fails the boot check
    let mut keypad = match Keypad::new(KEYMAP, &MATRIX, columns, rows, BusyDelay) {
        Ok(keypad) => keypad,
        Err(_) => halt(&mut led),
    };

    let mut usb = UsbKeyboard::new();
    usb.init(&dp);

    loop {
        usb.poll(&dp);

        keypad.tick(&mut usb.link(&dp));
        usb.flush(&dp);

        // LED lit while any switch is held
        led.set(keypad.pressed().iter().flatten().any(|&closed| closed));
    }
}

/// Stop with the LED lit.
fn halt(led: &mut Led) -> ! {
    led.set(true);
    loop {}
}
