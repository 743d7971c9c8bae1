//! Static wire layout of the Kontrol Z1: where each control lives in the
//! input report, what it is called, and how the LED channels are ordered.

use crate::device::{DeviceInfo, EventKind, ItemInfo};

pub const VENDOR_ID: u16 = 0x17cc;
pub const PRODUCT_ID: u16 = 0x1210;

pub const USB_INTERFACE_ID: u8 = 0x03;
pub const USB_READ_ENDPOINT: u8 = 0x82;
pub const USB_WRITE_ENDPOINT: u8 = 0x02;

/// Size of the only input report the device sends.
pub const INPUT_REPORT_SIZE: usize = 30;
/// Largest buffer handed to one interrupt read.
pub const POLL_BUFFER_SIZE: usize = 1024;

pub const SLIDER_COUNT: usize = 14;
pub const BUTTON_COUNT: usize = 5;
pub const CONTROL_COUNT: usize = SLIDER_COUNT + BUTTON_COUNT;

/// Where one control lives in the input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlDescriptor {
    /// Same as the entry's index in its table.
    pub logical_id: u32,
    pub byte_offset: usize,
    pub mask: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderId {
    LeftGain,
    LeftEqHigh,
    LeftEqMid,
    LeftEqLow,
    LeftFilter,
    RightGain,
    RightEqHigh,
    RightEqMid,
    RightEqLow,
    RightFilter,
    CueMix,
    LeftFader,
    RightFader,
    Crossfader,
}

impl SliderId {
    pub const ALL: [SliderId; SLIDER_COUNT] = [
        SliderId::LeftGain,
        SliderId::LeftEqHigh,
        SliderId::LeftEqMid,
        SliderId::LeftEqLow,
        SliderId::LeftFilter,
        SliderId::RightGain,
        SliderId::RightEqHigh,
        SliderId::RightEqMid,
        SliderId::RightEqLow,
        SliderId::RightFilter,
        SliderId::CueMix,
        SliderId::LeftFader,
        SliderId::RightFader,
        SliderId::Crossfader,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    CueA,
    CueB,
    Mode,
    FxOnLeft,
    FxOnRight,
}

impl ButtonId {
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::CueA,
        ButtonId::CueB,
        ButtonId::Mode,
        ButtonId::FxOnLeft,
        ButtonId::FxOnRight,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    /// LED channel sitting under this button.
    pub fn led(self) -> u32 {
        match self {
            ButtonId::CueA => LED_CUE_A,
            ButtonId::CueB => LED_CUE_B,
            ButtonId::Mode => LED_MODE,
            ButtonId::FxOnLeft => LED_FX_ON_LEFT,
            ButtonId::FxOnRight => LED_FX_ON_RIGHT,
        }
    }
}

const fn slider(id: SliderId, byte_offset: usize) -> ControlDescriptor {
    // Only 12 bits carry data, but the full-width mask is what the device
    // has always been read with.
    ControlDescriptor {
        logical_id: id as u32,
        byte_offset,
        mask: u32::MAX,
    }
}

const fn button(id: ButtonId, mask: u32) -> ControlDescriptor {
    ControlDescriptor {
        logical_id: id as u32,
        byte_offset: 29,
        mask,
    }
}

pub static SLIDERS: [ControlDescriptor; SLIDER_COUNT] = [
    // Left
    slider(SliderId::LeftGain, 1),
    slider(SliderId::LeftEqHigh, 3),
    slider(SliderId::LeftEqMid, 5),
    slider(SliderId::LeftEqLow, 7),
    slider(SliderId::LeftFilter, 9),
    // Right
    slider(SliderId::RightGain, 11),
    slider(SliderId::RightEqHigh, 13),
    slider(SliderId::RightEqMid, 15),
    slider(SliderId::RightEqLow, 17),
    slider(SliderId::RightFilter, 19),
    // Mixer
    slider(SliderId::CueMix, 21),
    slider(SliderId::LeftFader, 23),
    slider(SliderId::RightFader, 25),
    slider(SliderId::Crossfader, 27),
];

pub static BUTTONS: [ControlDescriptor; BUTTON_COUNT] = [
    button(ButtonId::CueA, 0x10),
    button(ButtonId::CueB, 0x01),
    button(ButtonId::Mode, 0x02),
    button(ButtonId::FxOnLeft, 0x04),
    button(ButtonId::FxOnRight, 0x08),
];

static SLIDER_NAMES: [&str; SLIDER_COUNT] = [
    "Gain (Left)",
    "Eq High (Left)",
    "Eq Mid (Left)",
    "Eq Low (Left)",
    "Filter (Left)",
    "Gain (Right)",
    "Eq High (Right)",
    "Eq Mid (Right)",
    "Eq Low (Right)",
    "Filter (Right)",
    "Cue Mix",
    "Fader (Left)",
    "Fader (Right)",
    "Crossfader",
];

static BUTTON_NAMES: [&str; BUTTON_COUNT] = ["A", "B", "Mode", "On (L)", "On (R)"];

static BUTTON_INFO: [ItemInfo; BUTTON_COUNT] = [
    ItemInfo { x: 44, y: 120, w: 8, h: 8 },
    ItemInfo { x: 68, y: 120, w: 8, h: 8 },
    ItemInfo { x: 53, y: 165, w: 18, h: 8 },
    ItemInfo { x: 13, y: 165, w: 18, h: 8 },
    ItemInfo { x: 90, y: 165, w: 18, h: 8 },
];

// LED channels, in output report order.
pub const LED_METER_SEGMENTS: u32 = 7;
/// Bottom segment of the left level meter.
pub const LED_METER_LEFT: u32 = 0;
/// Bottom segment of the right level meter.
pub const LED_METER_RIGHT: u32 = LED_METER_LEFT + LED_METER_SEGMENTS;
pub const LED_CUE_A: u32 = 14;
pub const LED_CUE_B: u32 = 15;
pub const LED_MODE: u32 = 16;
/// Orange half; the blue half is the next channel.
pub const LED_FX_ON_LEFT: u32 = 17;
/// Orange half; the blue half is the next channel.
pub const LED_FX_ON_RIGHT: u32 = 19;
pub const LED_COUNT: usize = 21;

/// Channels backed by an orange/blue pair instead of a single LED.
pub fn is_dual_color(light_id: u32) -> bool {
    light_id == LED_FX_ON_LEFT || light_id == LED_FX_ON_RIGHT
}

/// Display name of a control, or `None` when `control` is out of range.
pub fn control_name(kind: EventKind, control: u32) -> Option<&'static str> {
    let names: &[&'static str] = match kind {
        EventKind::Slider => &SLIDER_NAMES,
        EventKind::Button => &BUTTON_NAMES,
    };
    names.get(control as usize).copied()
}

pub static KONTROL_Z1_INFO: DeviceInfo = DeviceInfo {
    vendor: "Native Instruments",
    device: "Kontrol Z1",
    vendor_id: VENDOR_ID,
    device_id: PRODUCT_ID,
    size_x: 120,
    size_y: 294,
    button_count: BUTTON_COUNT,
    slider_count: SLIDER_COUNT,
    button_info: &BUTTON_INFO,
    slider_info: &[],
    get_name: control_name,
};
