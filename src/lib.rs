//! Driver core for the Native Instruments Kontrol Z1.
//!
//! Decodes the controller's 30-byte input report into [`Z1Event`]s and packs
//! LED changes into the output report, writing it only when something changed.
//! USB access goes through the [`usb`] traits so the core can be driven by
//! any transport.

pub mod config;
pub mod device;
pub mod error;
pub mod usb;
pub mod z1_controller;

pub use config::Z1Config;
pub use device::{ControllerDevice, DeviceInfo, EventKind, ItemInfo, Z1Event};
pub use error::{Z1Error, Z1Result};
pub use z1_controller::{KontrolZ1, Z1State};
