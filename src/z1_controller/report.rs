//! Input report decoding.

use tracing::trace;

use super::{
    descriptors::{ControlDescriptor, BUTTONS, INPUT_REPORT_SIZE, SLIDERS, SLIDER_COUNT},
    z1_state::Z1State,
};
use crate::device::Z1Event;

/// Full scale of the slider ADC.
pub const SLIDER_SCALE: f32 = 4096.0;

/// Read the 16-bit little-endian field at `offset`, masked down to 16 bits.
///
/// A byte past the end of `buf` reads as zero; the button status byte is the
/// last byte of the report but is still read as a 16-bit field.
pub fn read_field(buf: &[u8], desc: &ControlDescriptor) -> u16 {
    let lo = buf.get(desc.byte_offset).copied().unwrap_or(0);
    let hi = buf.get(desc.byte_offset + 1).copied().unwrap_or(0);
    let raw = u32::from(u16::from_le_bytes([lo, hi]));
    (raw & desc.mask) as u16
}

pub fn slider_value(raw: u16) -> f32 {
    f32::from(raw) / SLIDER_SCALE
}

/// Decode one report into `state`, calling `emit` once per changed control.
///
/// Reports that are not exactly [`INPUT_REPORT_SIZE`] bytes long are dropped
/// without touching `state`. Returns the number of events emitted.
pub fn decode<F>(state: &mut Z1State, buf: &[u8], mut emit: F) -> usize
where
    F: FnMut(Z1Event),
{
    if buf.len() != INPUT_REPORT_SIZE {
        trace!(len = buf.len(), "ignoring report of unexpected size");
        return 0;
    }

    let mut emitted = 0;

    for (i, desc) in SLIDERS.iter().enumerate() {
        let v = read_field(buf, desc);
        if state.replace(i, v) {
            emit(Z1Event::Slider {
                id: i as u32,
                value: slider_value(v),
            });
            emitted += 1;
        }
    }

    for (i, desc) in BUTTONS.iter().enumerate() {
        let v = read_field(buf, desc);
        if state.replace(SLIDER_COUNT + i, v) {
            emit(Z1Event::Button {
                id: i as u32,
                pressed: v > 0,
            });
            emitted += 1;
        }
    }

    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::z1_controller::descriptors::{ButtonId, SliderId};

    fn decode_all(state: &mut Z1State, buf: &[u8]) -> Vec<Z1Event> {
        let mut events = Vec::new();
        decode(state, buf, |e| events.push(e));
        events
    }

    fn report() -> [u8; INPUT_REPORT_SIZE] {
        [0; INPUT_REPORT_SIZE]
    }

    #[test]
    fn full_scale_slider_then_repeat() {
        let mut state = Z1State::new();
        let mut buf = report();
        buf[1] = 0x00;
        buf[2] = 0x10;

        let events = decode_all(&mut state, &buf);
        assert_eq!(events, vec![Z1Event::Slider { id: 0, value: 1.0 }]);

        assert!(decode_all(&mut state, &buf).is_empty());
    }

    #[test]
    fn slider_boundaries() {
        assert_eq!(slider_value(0), 0.0);
        assert!((slider_value(4095) - 0.999_755_86).abs() < 1e-6);
    }

    #[test]
    fn crossfader_reads_little_endian() {
        let mut state = Z1State::new();
        let mut buf = report();
        buf[27] = 0x34;
        buf[28] = 0x02;

        let events = decode_all(&mut state, &buf);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id(), SliderId::Crossfader.index());
        assert_eq!(state.get(SliderId::Crossfader as usize), Some(0x0234));
    }

    #[test]
    fn slider_above_full_scale_is_not_clamped() {
        let mut state = Z1State::new();
        let mut buf = report();
        buf[1] = 0xFF;
        buf[2] = 0xFF;
        // bits with no button behind them
        buf[29] = 0xE0;

        let events = decode_all(&mut state, &buf);
        assert_eq!(
            events,
            vec![Z1Event::Slider {
                id: 0,
                value: 65535.0 / 4096.0
            }]
        );
        assert_eq!(state.get(0), Some(0xFFFF));
        assert!((0..BUTTONS.len()).all(|i| state.get(SLIDER_COUNT + i) == Some(0)));
    }

    #[test]
    fn wrong_length_is_dropped() {
        let mut state = Z1State::new();
        let buf = [0xFFu8; 31];
        assert!(decode_all(&mut state, &buf).is_empty());
        assert!(decode_all(&mut state, &buf[..29]).is_empty());
        assert_eq!(state, Z1State::new());
    }

    #[test]
    fn one_button_bit_emits_one_event() {
        let mut state = Z1State::new();
        let mut buf = report();
        buf[29] = 0x04;

        let events = decode_all(&mut state, &buf);
        assert_eq!(
            events,
            vec![Z1Event::Button {
                id: ButtonId::FxOnLeft.index(),
                pressed: true
            }]
        );

        buf[29] = 0x04 | 0x10;
        let events = decode_all(&mut state, &buf);
        assert_eq!(
            events,
            vec![Z1Event::Button {
                id: ButtonId::CueA.index(),
                pressed: true
            }]
        );
        assert_eq!(state.get(SLIDER_COUNT + ButtonId::FxOnLeft as usize), Some(0x04));

        buf[29] = 0x10;
        let events = decode_all(&mut state, &buf);
        assert_eq!(
            events,
            vec![Z1Event::Button {
                id: ButtonId::FxOnLeft.index(),
                pressed: false
            }]
        );
        assert_eq!(state.get(SLIDER_COUNT + ButtonId::CueA as usize), Some(0x10));
    }

    #[test]
    fn sliders_come_before_buttons_in_index_order() {
        let mut state = Z1State::new();
        let mut buf = report();
        buf[25] = 1;
        buf[3] = 1;
        buf[29] = 0x1F;

        let events = decode_all(&mut state, &buf);
        let order: Vec<_> = events.iter().map(|e| (e.kind(), e.id())).collect();
        use crate::device::EventKind::{Button, Slider};
        assert_eq!(
            order,
            vec![
                (Slider, 1),
                (Slider, 12),
                (Button, 0),
                (Button, 1),
                (Button, 2),
                (Button, 3),
                (Button, 4),
            ]
        );
    }

    #[test]
    fn zero_position_at_startup_is_silent() {
        let mut state = Z1State::new();
        assert!(decode_all(&mut state, &report()).is_empty());
    }
}
