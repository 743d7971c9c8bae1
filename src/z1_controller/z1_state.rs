use super::descriptors::{CONTROL_COUNT, LED_COUNT};

/// Last observed raw value of every control plus the pending LED frame.
///
/// Control slots hold sliders first, then buttons
/// (`SLIDER_COUNT + button_index`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Z1State {
    control_values: [u16; CONTROL_COUNT],
    leds: [u8; LED_COUNT],
    leds_dirty: bool,
}

impl Default for Z1State {
    fn default() -> Self {
        Self {
            control_values: [0; CONTROL_COUNT],
            leds: [0; LED_COUNT],
            leds_dirty: false,
        }
    }
}

impl Z1State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.control_values.get(index).copied()
    }

    pub fn set(&mut self, index: usize, value: u16) {
        if let Some(slot) = self.control_values.get_mut(index) {
            *slot = value;
        }
    }

    /// Store `value` and report whether it differs from what was cached.
    pub(crate) fn replace(&mut self, index: usize, value: u16) -> bool {
        match self.control_values.get_mut(index) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn led(&self, channel: usize) -> Option<u8> {
        self.leds.get(channel).copied()
    }

    /// Returns `false` for an out-of-range channel.
    pub fn set_led(&mut self, channel: usize, value: u8) -> bool {
        let Some(slot) = self.leds.get_mut(channel) else {
            return false;
        };
        if *slot != value {
            *slot = value;
            self.leds_dirty = true;
        }
        true
    }

    pub fn leds(&self) -> &[u8; LED_COUNT] {
        &self.leds
    }

    pub fn clear_leds(&mut self) {
        for channel in 0..LED_COUNT {
            self.set_led(channel, 0);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.leds_dirty
    }

    pub fn mark_dirty(&mut self) {
        self.leds_dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.leds_dirty = false;
    }
}
