//! USB HID keyboard device for the ATmega32U4.
//!
//! Register-level driver for the built-in USB controller: enumeration on
//! endpoint 0 and boot-protocol keyboard reports on the interrupt endpoint 1.
//! Key actions from the scan loop are applied to the pending report through
//! [`HostLink`], which pushes every change to the host as its own report.
//! [`UsbKeyboard::flush`] runs once per loop as well, so a report the host
//! did not pick up is retried until it is.

use avr_device::atmega32u4::Peripherals;
use keypad_core::{HostReport, KeySink, Keycode};

// Endpoint sizes
const EP0_SIZE: u8 = 64;
const EP1_SIZE: u8 = 8;

/// HID report descriptor for a boot keyboard: modifier byte, reserved byte,
/// LED output bits and six key slots.
static HID_REPORT_DESCRIPTOR: [u8; 63] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0xE0, //   Usage Minimum (LCtrl)
    0x29, 0xE7, //   Usage Maximum (RGui)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute): modifiers
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant): reserved
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x91, 0x02, //   Output (Data, Variable, Absolute): LEDs
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant): LED padding
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0xE7, //   Logical Maximum (231)
    0x05, 0x07, //   Usage Page (Key Codes)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xE7, //   Usage Maximum (231)
    0x81, 0x00, //   Input (Data, Array): key slots
    0xC0, // End Collection
];

static DEVICE_DESCRIPTOR: [u8; 18] = [
    18, 1, // bLength, bDescriptorType (Device)
    0x00, 0x02, // bcdUSB 2.00
    0, 0, 0, // class/subclass/protocol defined per interface
    EP0_SIZE, // bMaxPacketSize0
    0x41, 0x23, // idVendor 0x2341
    0x36, 0x80, // idProduct 0x8036
    0x01, 0x00, // bcdDevice 0.01
    1, 2, 0, // iManufacturer, iProduct, iSerialNumber
    1, // bNumConfigurations
];

static CONFIG_DESCRIPTOR: [u8; 34] = [
    // Configuration
    9, 2, // bLength, bDescriptorType
    34, 0, // wTotalLength
    1, 1, 0, // bNumInterfaces, bConfigurationValue, iConfiguration
    0x80, // bmAttributes: bus powered
    50, // bMaxPower: 100 mA
    // Interface 0: HID boot keyboard
    9, 4, // bLength, bDescriptorType
    0, 0, 1, // bInterfaceNumber, bAlternateSetting, bNumEndpoints
    3, 1, 1, // class HID, subclass boot, protocol keyboard
    0, // iInterface
    // HID
    9, 0x21, // bLength, bDescriptorType
    0x11, 0x01, // bcdHID 1.11
    0, 1, // bCountryCode, bNumDescriptors
    0x22, HID_REPORT_DESCRIPTOR.len() as u8, 0, // report descriptor type and length
    // Endpoint 1 IN, interrupt
    7, 5, // bLength, bDescriptorType
    0x81, 0x03, // bEndpointAddress, bmAttributes
    EP1_SIZE, 0, // wMaxPacketSize
    10, // bInterval: 10 ms
];

static STRING_LANGUAGES: [u8; 4] = [4, 3, 0x09, 0x04]; // en-US

static STRING_MANUFACTURER: [u8; 14] = [
    14, 3, b'M', 0, b'a', 0, b't', 0, b'r', 0, b'i', 0, b'x', 0,
];

static STRING_PRODUCT: [u8; 14] = [
    14, 3, b'K', 0, b'e', 0, b'y', 0, b'p', 0, b'a', 0, b'd', 0,
];

/// The eight bytes of a control SETUP packet.
struct Setup {
    request_type: u8,
    request: u8,
    value: u16,
    length: u16,
}

impl Setup {
    fn read(dp: &Peripherals) -> Self {
        let mut raw = [0u8; 8];
        for byte in raw.iter_mut() {
            *byte = dp.USB_DEVICE.uedatx.read().bits();
        }
        Self {
            request_type: raw[0],
            request: raw[1],
            value: u16::from_le_bytes([raw[2], raw[3]]),
            length: u16::from_le_bytes([raw[6], raw[7]]),
        }
    }

    fn descriptor_type(&self) -> u8 {
        (self.value >> 8) as u8
    }

    fn descriptor_index(&self) -> u8 {
        self.value as u8
    }
}

pub struct UsbKeyboard {
    configured: bool,
    protocol: u8,
    idle: u8,
    report: HostReport,
}

impl UsbKeyboard {
    pub const fn new() -> Self {
        Self {
            configured: false,
            protocol: 1,
            idle: 0,
            report: HostReport::new(),
        }
    }

    /// Power up the USB controller and attach to the bus.
    pub fn init(&mut self, dp: &Peripherals) {
        let usb = &dp.USB_DEVICE;

        usb.uhwcon.write(|w| w.uvrege().set_bit());
        usb.usbcon.write(|w| w.usbe().set_bit().otgpade().set_bit());

        // 16 MHz crystal, PLL input divided by two
        dp.PLL.pllcsr.write(|w| w.pindiv().set_bit().plle().set_bit());
        while dp.PLL.pllcsr.read().plock().bit_is_clear() {}

        usb.usbcon.modify(|_, w| w.frzclk().clear_bit());
        usb.udcon.modify(|_, w| w.detach().clear_bit());
        usb.udien.write(|w| w.eorste().set_bit());

        self.configured = false;
    }

    /// Service bus resets and control requests. Call once per loop.
    pub fn poll(&mut self, dp: &Peripherals) {
        let usb = &dp.USB_DEVICE;

        if usb.udint.read().eorsti().bit_is_set() {
            usb.udint.modify(|_, w| w.eorsti().clear_bit());
            configure_control(dp);
            self.configured = false;
            self.report.host_reset();
        }

        select(dp, 0);
        if usb.ueintx.read().rxstpi().bit_is_set() {
            let setup = Setup::read(dp);
            usb.ueintx.modify(|_, w| w.rxstpi().clear_bit());
            self.handle(dp, &setup);
        }
    }

    /// Bind the keyboard to the peripherals for one scan cycle.
    pub fn link<'a>(&'a mut self, dp: &'a Peripherals) -> HostLink<'a> {
        HostLink { usb: self, dp }
    }

    /// Push the pending report if the host has not seen it yet. Call once
    /// per loop; a no-op when the host is up to date.
    pub fn flush(&mut self, dp: &Peripherals) {
        if !self.configured {
            return;
        }
        let Some(bytes) = self.report.pending() else {
            return;
        };

        let usb = &dp.USB_DEVICE;
        select(dp, 1);

        // Host not polling: leave the report pending for the next loop.
        let mut timeout: u16 = 0xFFFF;
        while usb.ueintx.read().rwal().bit_is_clear() {
            timeout = timeout.wrapping_sub(1);
            if timeout == 0 {
                return;
            }
        }

        for byte in bytes {
            usb.uedatx.write(|w| w.bits(byte));
        }
        usb.ueintx.modify(|_, w| w.fifocon().clear_bit().txini().clear_bit());

        self.report.mark_sent(bytes);
    }

    fn handle(&mut self, dp: &Peripherals, setup: &Setup) {
        match (setup.request_type, setup.request) {
            // GET_DESCRIPTOR (device)
            (0x80, 0x06) => {
                let desc: Option<&[u8]> = match (setup.descriptor_type(), setup.descriptor_index()) {
                    (1, _) => Some(&DEVICE_DESCRIPTOR),
                    (2, _) => Some(&CONFIG_DESCRIPTOR),
                    (3, 0) => Some(&STRING_LANGUAGES),
                    (3, 1) => Some(&STRING_MANUFACTURER),
                    (3, 2) => Some(&STRING_PRODUCT),
                    _ => None,
                };
                match desc {
                    Some(desc) => send_control(dp, desc, setup.length),
                    None => stall(dp),
                }
            }
            // GET_DESCRIPTOR (interface): HID report descriptor
            (0x81, 0x06) if setup.descriptor_type() == 0x22 => {
                send_control(dp, &HID_REPORT_DESCRIPTOR, setup.length)
            }
            // SET_ADDRESS: acknowledge first, then latch the address
            (0x00, 0x05) => {
                let usb = &dp.USB_DEVICE;
                zero_length(dp);
                while usb.ueintx.read().txini().bit_is_clear() {}
                usb.udaddr
                    .write(|w| w.uadd().bits(setup.value as u8 & 0x7F).adden().set_bit());
            }
            // SET_CONFIGURATION
            (0x00, 0x09) => {
                zero_length(dp);
                configure_interrupt_in(dp);
                self.configured = true;
                self.report.host_reset();
            }
            // GET_CONFIGURATION
            (0x80, 0x08) => send_control(dp, &[self.configured as u8], setup.length),
            // HID GET_REPORT
            (0xA1, 0x01) => send_control(dp, &self.report.report().as_bytes(), setup.length),
            // HID GET_IDLE
            (0xA1, 0x02) => send_control(dp, &[self.idle], setup.length),
            // HID GET_PROTOCOL
            (0xA1, 0x03) => send_control(dp, &[self.protocol], setup.length),
            // HID SET_IDLE
            (0x21, 0x0A) => {
                self.idle = (setup.value >> 8) as u8;
                zero_length(dp);
            }
            // HID SET_PROTOCOL
            (0x21, 0x0B) => {
                self.protocol = setup.value as u8;
                zero_length(dp);
            }
            _ => stall(dp),
        }
    }
}

/// Key sink that forwards every action to the host straight away, so a
/// modifier reaches the host in an earlier report than its key.
pub struct HostLink<'a> {
    usb: &'a mut UsbKeyboard,
    dp: &'a Peripherals,
}

impl KeySink for HostLink<'_> {
    fn send_key(&mut self, code: Keycode, is_modifier: bool, is_down: bool) {
        self.usb.report.send_key(code, is_modifier, is_down);
        self.usb.flush(self.dp);
    }
}

fn select(dp: &Peripherals, endpoint: u8) {
    dp.USB_DEVICE.uenum.write(|w| w.bits(endpoint & 0x07));
}

fn configure_control(dp: &Peripherals) {
    let usb = &dp.USB_DEVICE;
    select(dp, 0);
    usb.ueconx.write(|w| w.epen().set_bit());
    usb.uecfg0x.write(|w| w.eptype().bits(0b00));
    // 64 bytes, one bank
    usb.uecfg1x.write(|w| w.epsize().bits(0b011).alloc().set_bit());
}

fn configure_interrupt_in(dp: &Peripherals) {
    let usb = &dp.USB_DEVICE;
    select(dp, 1);
    usb.ueconx.write(|w| w.epen().set_bit());
    usb.uecfg0x.write(|w| w.eptype().bits(0b11).epdir().set_bit());
    // 8 bytes, one bank
    usb.uecfg1x.write(|w| w.epsize().bits(0b000).alloc().set_bit());
}

/// Answer a control IN request with `data`, truncated to what the host asked for.
fn send_control(dp: &Peripherals, data: &[u8], requested: u16) {
    let usb = &dp.USB_DEVICE;
    let len = data.len().min(requested as usize);

    for chunk in data[..len].chunks(EP0_SIZE as usize) {
        while usb.ueintx.read().txini().bit_is_clear() {}
        for &byte in chunk {
            usb.uedatx.write(|w| w.bits(byte));
        }
        usb.ueintx.modify(|_, w| w.txini().clear_bit());
    }

    // Status stage: the host answers with a zero-length OUT
    while usb.ueintx.read().rxouti().bit_is_clear() {}
    usb.ueintx.modify(|_, w| w.rxouti().clear_bit());
}

fn zero_length(dp: &Peripherals) {
    dp.USB_DEVICE.ueintx.modify(|_, w| w.txini().clear_bit());
}

fn stall(dp: &Peripherals) {
    dp.USB_DEVICE.ueconx.modify(|_, w| w.stallrq().set_bit());
}
