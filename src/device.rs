//! Host-facing surface shared by controller drivers: the event type handed to
//! the host callback, static device metadata, and the capability trait a host
//! drives a connected controller through.

use crate::error::Z1Result;

/// Kind of control an event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Button,
    Slider,
}

/// One control state change.
///
/// `id` is the index of the control within its kind's table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Z1Event {
    /// `value` is nominally `0.0..=1.0`.
    Slider { id: u32, value: f32 },
    Button { id: u32, pressed: bool },
}

impl Z1Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Z1Event::Slider { .. } => EventKind::Slider,
            Z1Event::Button { .. } => EventKind::Button,
        }
    }

    pub fn id(&self) -> u32 {
        match *self {
            Z1Event::Slider { id, .. } | Z1Event::Button { id, .. } => id,
        }
    }
}

/// Position and size of a control on the device's face plate, in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemInfo {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Static metadata a host uses to present a device.
#[derive(Debug)]
pub struct DeviceInfo {
    pub vendor: &'static str,
    pub device: &'static str,
    pub vendor_id: u16,
    pub device_id: u16,
    pub size_x: u32,
    pub size_y: u32,
    pub button_count: usize,
    pub slider_count: usize,
    pub button_info: &'static [ItemInfo],
    pub slider_info: &'static [ItemInfo],
    pub get_name: fn(EventKind, u32) -> Option<&'static str>,
}

impl DeviceInfo {
    pub fn control_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Button => self.button_count,
            EventKind::Slider => self.slider_count,
        }
    }

    pub fn control_info(&self, kind: EventKind) -> &'static [ItemInfo] {
        match kind {
            EventKind::Button => self.button_info,
            EventKind::Slider => self.slider_info,
        }
    }

    pub fn control_name(&self, kind: EventKind, control: u32) -> Option<&'static str> {
        (self.get_name)(kind, control)
    }
}

/// Entry points a host framework calls on a connected controller.
pub trait ControllerDevice {
    fn info(&self) -> &'static DeviceInfo;

    /// Perform one interrupt read and deliver whatever arrived to
    /// [`ControllerDevice::report_received`].
    fn poll(&mut self) -> Z1Result<()>;

    /// Decode one report delivered by the transport.
    fn report_received(&mut self, endpoint: u8, data: &[u8]);

    fn light_set(&mut self, light_id: u32, light_status: u32);

    fn light_flush(&mut self, force: bool);

    /// Mark the device unreachable; disconnect then skips the final flush.
    fn banish(&mut self);

    fn is_banished(&self) -> bool;

    /// Turn the lights off and release the transport.
    fn disconnect(self: Box<Self>);
}

#[cfg(test)]
mod tests {
    use super::{EventKind, Z1Event};

    #[test]
    fn event_kind_and_id() {
        let slider = Z1Event::Slider { id: 3, value: 0.5 };
        let button = Z1Event::Button {
            id: 4,
            pressed: true,
        };
        assert_eq!(slider.kind(), EventKind::Slider);
        assert_eq!(slider.id(), 3);
        assert_eq!(button.kind(), EventKind::Button);
        assert_eq!(button.id(), 4);
    }
}
