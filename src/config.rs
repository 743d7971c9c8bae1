use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Z1Error, Z1Result};

/// Runtime settings for the driver and the demo binary, read from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Z1Config {
    /// Interrupt read timeout used by `poll`.
    pub read_timeout_ms: u64,
    /// Interrupt write timeout used when flushing lights.
    pub write_timeout_ms: u64,
    /// Sleep between two polls in the demo loop.
    pub poll_interval_ms: u64,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Mirror control changes onto the LEDs.
    pub echo_lights: bool,
}

impl Default for Z1Config {
    fn default() -> Self {
        Self {
            read_timeout_ms: 10,
            write_timeout_ms: 50,
            poll_interval_ms: 2,
            log_filter: "info".into(),
            echo_lights: true,
        }
    }
}

impl Z1Config {
    /// Load a config file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Z1Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| Z1Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Z1Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
