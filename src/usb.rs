//! USB transport seam. The driver only ever talks to hardware through
//! [`UsbBus`] and [`UsbTransport`]; [`RusbBus`] is the libusb-backed
//! implementation used outside of tests.

use std::time::Duration;

use rusb::{Context, DeviceHandle, UsbContext};
use tracing::debug;

use crate::error::{Z1Error, Z1Result};

/// An opened USB device.
pub trait UsbTransport {
    /// Claim `interface` for interrupt transfers.
    fn open_interface(&mut self, interface: u8) -> rusb::Result<()>;

    fn interrupt_read(&mut self, endpoint: u8, buf: &mut [u8]) -> rusb::Result<usize>;

    fn interrupt_write(&mut self, endpoint: u8, buf: &[u8]) -> rusb::Result<usize>;

    /// Release everything claimed. Called exactly once per opened transport.
    fn close(&mut self);
}

/// Something that can open a device by vendor/product id.
pub trait UsbBus {
    type Transport: UsbTransport;

    fn open(&self, vendor_id: u16, product_id: u16) -> Z1Result<Self::Transport>;
}

pub struct RusbBus {
    context: Context,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl RusbBus {
    pub fn new(read_timeout: Duration, write_timeout: Duration) -> rusb::Result<Self> {
        Ok(Self {
            context: Context::new()?,
            read_timeout,
            write_timeout,
        })
    }
}

impl UsbBus for RusbBus {
    type Transport = RusbTransport;

    fn open(&self, vendor_id: u16, product_id: u16) -> Z1Result<RusbTransport> {
        let mut handle = None;

        for device in self.context.devices()?.iter() {
            let desc = device.device_descriptor()?;
            if desc.vendor_id() == vendor_id && desc.product_id() == product_id {
                handle = Some(device.open()?);
                break;
            }
        }

        let Some(handle) = handle else {
            return Err(Z1Error::DeviceNotFound {
                vendor_id,
                product_id,
            });
        };

        Ok(RusbTransport {
            handle,
            claimed: None,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        })
    }
}

pub struct RusbTransport {
    handle: DeviceHandle<Context>,
    claimed: Option<u8>,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl UsbTransport for RusbTransport {
    fn open_interface(&mut self, interface: u8) -> rusb::Result<()> {
        // Not supported on every platform; claiming still works without it.
        if let Err(err) = self.handle.set_auto_detach_kernel_driver(true) {
            debug!("kernel driver auto-detach unavailable: {err}");
        }
        self.handle.claim_interface(interface)?;
        self.claimed = Some(interface);
        debug!(interface, "claimed usb interface");
        Ok(())
    }

    fn interrupt_read(&mut self, endpoint: u8, buf: &mut [u8]) -> rusb::Result<usize> {
        self.handle.read_interrupt(endpoint, buf, self.read_timeout)
    }

    fn interrupt_write(&mut self, endpoint: u8, buf: &[u8]) -> rusb::Result<usize> {
        self.handle.write_interrupt(endpoint, buf, self.write_timeout)
    }

    fn close(&mut self) {
        if let Some(interface) = self.claimed.take() {
            if let Err(err) = self.handle.release_interface(interface) {
                debug!(interface, "failed to release usb interface: {err}");
            }
        }
    }
}
