use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the Z1 driver and its configuration layer.
#[derive(Debug, Error)]
pub enum Z1Error {
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("no device with vendor {vendor_id:#06x} / product {product_id:#06x} was found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("failed to claim usb interface {interface}: {source}")]
    ClaimInterface {
        interface: u8,
        #[source]
        source: rusb::Error,
    },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub type Z1Result<T> = Result<T, Z1Error>;
