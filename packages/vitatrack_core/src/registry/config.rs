use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::RegistryError;

/// Configuration for a `DeviceRegistry`.
///
/// Loaded from JSON; every field is optional in the file and falls back to
/// its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Simulated pairing latency for the default link.
    pub connect_latency_ms: u64,
    /// Fail a connect that has not paired within this long. Unset means wait
    /// until the link resolves or the attempt is cancelled.
    pub connect_timeout_ms: Option<u64>,
    /// Capacity of the change-event broadcast channel.
    pub event_capacity: usize,
    /// Start with the built-in sample devices.
    pub seed_sample_devices: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            connect_latency_ms: 2000,
            connect_timeout_ms: None,
            event_capacity: 64,
            seed_sample_devices: true,
        }
    }
}

impl RegistryConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let data = std::fs::read(path).map_err(|e| RegistryError::IoError(e.to_string()))?;
        let config: RegistryConfig = serde_json::from_slice(&data)
            .map_err(|e| RegistryError::DeserializationError(e.to_string()))?;
        log::debug!("Loaded registry config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn connect_latency(&self) -> Duration {
        Duration::from_millis(self.connect_latency_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
