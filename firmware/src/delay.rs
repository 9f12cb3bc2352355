//! Busy-wait delays calibrated for a 16 MHz core clock.

use embedded_hal::delay::DelayNs;

/// Roughly four cycles per iteration: the `nop` plus loop overhead.
const NS_PER_SPIN: u32 = 250;
const SPINS_PER_MS: u16 = 4000;

pub struct BusyDelay;

#[inline(always)]
fn spin(n: u32) {
    for _ in 0..n {
        unsafe { core::arch::asm!("nop") };
    }
}

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        spin(ns / NS_PER_SPIN);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            for _ in 0..SPINS_PER_MS {
                unsafe { core::arch::asm!("nop") };
            }
        }
    }
}
