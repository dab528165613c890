use serde::Serialize;

use super::device::{BatteryLevel, Device};

/// Change notifications broadcast by the registry.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DeviceEvent {
    Added { device: Device },
    Removed { id: String },
    Connecting { id: String },
    Connected { device: Device },
    ConnectFailed { id: String, reason: String },
    ConnectCancelled { id: String },
    Disconnected { id: String },
    BatteryChanged { id: String, level: BatteryLevel },
}

impl DeviceEvent {
    /// Id of the device the event concerns.
    pub fn device_id(&self) -> &str {
        match self {
            DeviceEvent::Added { device } | DeviceEvent::Connected { device } => &device.id,
            DeviceEvent::Removed { id }
            | DeviceEvent::Connecting { id }
            | DeviceEvent::ConnectFailed { id, .. }
            | DeviceEvent::ConnectCancelled { id }
            | DeviceEvent::Disconnected { id }
            | DeviceEvent::BatteryChanged { id, .. } => id,
        }
    }
}
