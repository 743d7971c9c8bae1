use tracing::{debug, warn};

use super::{
    descriptors::{is_dual_color, LED_COUNT, USB_WRITE_ENDPOINT},
    z1_state::Z1State,
};
use crate::usb::UsbTransport;

/// Leading byte of every LED output report.
///
/// The lights live on interface 3, but the device only accepts this select
/// code in front of the frame.
pub const LIGHTS_INTERFACE: u8 = 0x80;
pub const OUTPUT_REPORT_SIZE: usize = LED_COUNT + 1;

pub const LED_BRIGHT: u8 = 0x7F;
pub const LED_DIM: u8 = 0x05;

/// Pack a single-colour brightness (`0..=0x7F`) into a light status word.
pub fn brightness_status(brightness: u8) -> u32 {
    u32::from(brightness & 0x7F) << 24
}

/// Pack the two halves of an FX On indicator into a light status word.
pub fn dual_color_status(orange: u8, blue: u8) -> u32 {
    (u32::from(orange) << 16) | u32::from(blue)
}

/// Apply one light request to the LED frame. Unknown ids are ignored.
pub fn set_light(state: &mut Z1State, light_id: u32, light_status: u32) {
    let channel = light_id as usize;
    if channel >= LED_COUNT {
        return;
    }

    let bright = ((light_status >> 24) & 0x7F) as u8;
    state.set_led(channel, bright);

    // FX On buttons have orange and blue
    if is_dual_color(light_id) {
        let orange = ((light_status >> 16) & 0xFF) as u8;
        let blue = (light_status & 0xFF) as u8;
        state.set_led(channel, orange);
        state.set_led(channel + 1, blue);
    }

    state.mark_dirty();
}

/// Serialize the LED frame behind the select byte.
pub fn encode_output_report(state: &Z1State) -> [u8; OUTPUT_REPORT_SIZE] {
    let mut report = [0u8; OUTPUT_REPORT_SIZE];
    report[0] = LIGHTS_INTERFACE;
    report[1..].copy_from_slice(state.leds());
    report
}

/// Write the LED frame if it changed since the last flush, or if `force`.
///
/// Returns whether a write was attempted. A failed write is logged and the
/// frame is still considered flushed; the next light change sends it again.
pub fn flush<T: UsbTransport>(transport: &mut T, state: &mut Z1State, force: bool) -> bool {
    if !state.is_dirty() && !force {
        return false;
    }

    let report = encode_output_report(state);
    match transport.interrupt_write(USB_WRITE_ENDPOINT, &report) {
        Ok(written) => debug!(written, force, "flushed lights"),
        Err(err) => warn!("light write failed: {err}"),
    }
    state.clear_dirty();
    true
}
