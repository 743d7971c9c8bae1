use tracing::{debug, info, warn};

use super::{
    descriptors::{
        KONTROL_Z1_INFO, POLL_BUFFER_SIZE, PRODUCT_ID, USB_INTERFACE_ID, USB_READ_ENDPOINT,
        VENDOR_ID,
    },
    lights, report,
    z1_state::Z1State,
};
use crate::{
    device::{ControllerDevice, DeviceInfo, Z1Event},
    error::{Z1Error, Z1Result},
    usb::{UsbBus, UsbTransport},
};

type EventCallback = Box<dyn FnMut(Z1Event) + Send + 'static>;

/// A connected Kontrol Z1.
///
/// Owns the transport and the control/LED cache. Decoded events go to the
/// callback given at connect time; LED changes accumulate until a flush.
pub struct KontrolZ1<T: UsbTransport> {
    transport: T,
    state: Z1State,
    banished: bool,
    event_callback: EventCallback,
}

impl<T: UsbTransport> KontrolZ1<T> {
    /// Open the first Kontrol Z1 on `bus` and claim its HID interface.
    ///
    /// Nothing stays open if any step fails.
    pub fn connect<B, F>(bus: &B, event_callback: F) -> Z1Result<Self>
    where
        B: UsbBus<Transport = T>,
        F: FnMut(Z1Event) + Send + 'static,
    {
        let state = Z1State::new();
        let mut transport = bus.open(VENDOR_ID, PRODUCT_ID)?;

        if let Err(source) = transport.open_interface(USB_INTERFACE_ID) {
            transport.close();
            return Err(Z1Error::ClaimInterface {
                interface: USB_INTERFACE_ID,
                source,
            });
        }

        info!(
            vendor = KONTROL_Z1_INFO.vendor,
            device = KONTROL_Z1_INFO.device,
            "controller connected"
        );

        Ok(Self {
            transport,
            state,
            banished: false,
            event_callback: Box::new(event_callback),
        })
    }

    pub fn info(&self) -> &'static DeviceInfo {
        &KONTROL_Z1_INFO
    }

    /// Read one report from the device and decode it.
    ///
    /// A read timeout is not an error. If the device has gone away it is
    /// marked banished before the error is returned.
    pub fn poll(&mut self) -> Z1Result<()> {
        let mut buf = [0u8; POLL_BUFFER_SIZE];
        match self.transport.interrupt_read(USB_READ_ENDPOINT, &mut buf) {
            Ok(len) => {
                self.report_received(USB_READ_ENDPOINT, &buf[..len]);
                Ok(())
            }
            Err(rusb::Error::Timeout) => Ok(()),
            Err(rusb::Error::NoDevice) => {
                warn!("controller is no longer reachable");
                self.banished = true;
                Err(Z1Error::Usb(rusb::Error::NoDevice))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Decode a report delivered from `endpoint`, emitting one event per
    /// changed control.
    pub fn report_received(&mut self, _endpoint: u8, data: &[u8]) {
        report::decode(&mut self.state, data, &mut self.event_callback);
    }

    /// Queue a light change; see [`lights::set_light`] for the status layout.
    pub fn light_set(&mut self, light_id: u32, light_status: u32) {
        lights::set_light(&mut self.state, light_id, light_status);
    }

    pub fn light_flush(&mut self, force: bool) {
        lights::flush(&mut self.transport, &mut self.state, force);
    }

    /// Mark the device unreachable so that disconnect skips the final flush.
    pub fn banish(&mut self) {
        self.banished = true;
    }

    pub fn is_banished(&self) -> bool {
        self.banished
    }

    pub fn state(&self) -> &Z1State {
        &self.state
    }

    /// Turn every light off and release the device.
    pub fn disconnect(mut self) {
        self.state.clear_leds();
        if !self.banished {
            lights::flush(&mut self.transport, &mut self.state, true);
        } else {
            debug!("skipping final light flush for banished controller");
        }
        self.transport.close();
        info!(device = KONTROL_Z1_INFO.device, "controller disconnected");
    }
}

impl<T: UsbTransport> ControllerDevice for KontrolZ1<T> {
    fn info(&self) -> &'static DeviceInfo {
        KontrolZ1::info(self)
    }

    fn poll(&mut self) -> Z1Result<()> {
        KontrolZ1::poll(self)
    }

    fn report_received(&mut self, endpoint: u8, data: &[u8]) {
        KontrolZ1::report_received(self, endpoint, data)
    }

    fn light_set(&mut self, light_id: u32, light_status: u32) {
        KontrolZ1::light_set(self, light_id, light_status)
    }

    fn light_flush(&mut self, force: bool) {
        KontrolZ1::light_flush(self, force)
    }

    fn banish(&mut self) {
        KontrolZ1::banish(self)
    }

    fn is_banished(&self) -> bool {
        KontrolZ1::is_banished(self)
    }

    fn disconnect(self: Box<Self>) {
        KontrolZ1::disconnect(*self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        device::EventKind,
        usb::mock::{MockBus, MockTransport},
        z1_controller::{
            descriptors::{INPUT_REPORT_SIZE, LED_COUNT, LED_FX_ON_LEFT, LED_MODE},
            lights::{brightness_status, dual_color_status, LED_BRIGHT, LIGHTS_INTERFACE},
        },
    };

    fn connect(transport: &MockTransport) -> (KontrolZ1<MockTransport>, mpsc::Receiver<Z1Event>) {
        let (tx, rx) = mpsc::channel();
        let bus = MockBus {
            transport: Some(transport.clone()),
        };
        let dev = KontrolZ1::connect(&bus, move |event| {
            let _ = tx.send(event);
        })
        .unwrap();
        (dev, rx)
    }

    #[test]
    fn connect_claims_interface_three() {
        let transport = MockTransport::default();
        let (dev, _rx) = connect(&transport);
        assert_eq!(transport.log.lock().unwrap().claimed, vec![USB_INTERFACE_ID]);
        assert_eq!(dev.info().device, "Kontrol Z1");
        assert_eq!(dev.info().control_count(EventKind::Slider), 14);
        assert!(!dev.is_banished());
    }

    #[test]
    fn missing_device_fails_connect() {
        let bus = MockBus { transport: None };
        let result = KontrolZ1::connect(&bus, |_| {});
        assert!(matches!(result, Err(Z1Error::DeviceNotFound { .. })));
    }

    #[test]
    fn claim_failure_closes_transport() {
        let transport = MockTransport {
            fail_claim: true,
            ..Default::default()
        };
        let bus = MockBus {
            transport: Some(transport.clone()),
        };
        let result = KontrolZ1::connect(&bus, |_| {});
        assert!(matches!(
            result,
            Err(Z1Error::ClaimInterface {
                interface: USB_INTERFACE_ID,
                ..
            })
        ));
        assert_eq!(transport.closed(), 1);
    }

    #[test]
    fn poll_delivers_events_to_callback() {
        let transport = MockTransport::default();
        let (mut dev, rx) = connect(&transport);

        let mut report = vec![0u8; INPUT_REPORT_SIZE];
        report[1] = 0x00;
        report[2] = 0x10;
        transport.push_read(Ok(report.clone()));
        transport.push_read(Ok(report));

        dev.poll().unwrap();
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![Z1Event::Slider { id: 0, value: 1.0 }]);

        dev.poll().unwrap();
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn poll_timeout_is_quiet() {
        let transport = MockTransport::default();
        let (mut dev, rx) = connect(&transport);
        dev.poll().unwrap();
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn short_read_is_ignored() {
        let transport = MockTransport::default();
        let (mut dev, rx) = connect(&transport);
        transport.push_read(Ok(vec![0xFF; 12]));
        dev.poll().unwrap();
        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(dev.state(), &Z1State::new());
    }

    #[test]
    fn vanished_device_is_banished() {
        let transport = MockTransport::default();
        let (mut dev, _rx) = connect(&transport);
        transport.push_read(Err(rusb::Error::NoDevice));

        assert!(matches!(dev.poll(), Err(Z1Error::Usb(rusb::Error::NoDevice))));
        assert!(dev.is_banished());
    }

    #[test]
    fn other_read_errors_are_returned() {
        let transport = MockTransport::default();
        let (mut dev, _rx) = connect(&transport);
        transport.push_read(Err(rusb::Error::Io));

        assert!(matches!(dev.poll(), Err(Z1Error::Usb(rusb::Error::Io))));
        assert!(!dev.is_banished());
    }

    #[test]
    fn lights_flush_only_when_dirty() {
        let transport = MockTransport::default();
        let (mut dev, _rx) = connect(&transport);

        dev.light_flush(false);
        assert!(transport.writes().is_empty());

        dev.light_set(LED_MODE, brightness_status(LED_BRIGHT));
        dev.light_flush(false);
        dev.light_flush(false);
        assert_eq!(transport.writes().len(), 1);

        dev.light_flush(true);
        assert_eq!(transport.writes().len(), 2);
    }

    #[test]
    fn disconnect_turns_lights_off() {
        let transport = MockTransport::default();
        let (mut dev, _rx) = connect(&transport);
        dev.light_set(LED_MODE, brightness_status(LED_BRIGHT));
        dev.light_set(LED_FX_ON_LEFT, dual_color_status(0x7F, 0x7F));
        dev.light_flush(false);

        dev.disconnect();

        let writes = transport.writes();
        assert_eq!(writes.len(), 2);
        let (_, last) = writes.last().unwrap();
        assert_eq!(last[0], LIGHTS_INTERFACE);
        assert_eq!(last.len(), LED_COUNT + 1);
        assert!(last[1..].iter().all(|&b| b == 0));
        assert_eq!(transport.closed(), 1);
    }

    #[test]
    fn banished_disconnect_skips_flush() {
        let transport = MockTransport::default();
        let (mut dev, _rx) = connect(&transport);
        dev.light_set(LED_MODE, brightness_status(LED_BRIGHT));
        dev.banish();

        dev.disconnect();

        assert!(transport.writes().is_empty());
        assert_eq!(transport.closed(), 1);
    }

    #[test]
    fn host_drives_device_through_trait_object() {
        let transport = MockTransport::default();
        let (dev, rx) = connect(&transport);
        let mut dev: Box<dyn ControllerDevice> = Box::new(dev);

        let mut report = [0u8; INPUT_REPORT_SIZE];
        report[29] = 0x02;
        dev.report_received(USB_READ_ENDPOINT, &report);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![Z1Event::Button { id: 2, pressed: true }]);
        assert_eq!(dev.info().control_name(EventKind::Button, 2), Some("Mode"));

        dev.light_set(LED_MODE, brightness_status(LED_BRIGHT));
        dev.light_flush(false);
        dev.disconnect();
        assert_eq!(transport.writes().len(), 2);
        assert_eq!(transport.closed(), 1);
    }

    #[test]
    fn host_banish_through_trait_object_skips_flush() {
        let transport = MockTransport::default();
        let (dev, _rx) = connect(&transport);
        let mut dev: Box<dyn ControllerDevice> = Box::new(dev);

        dev.light_set(LED_MODE, brightness_status(LED_BRIGHT));
        assert!(!dev.is_banished());
        dev.banish();
        assert!(dev.is_banished());

        dev.disconnect();
        assert!(transport.writes().is_empty());
        assert_eq!(transport.closed(), 1);
    }
}
