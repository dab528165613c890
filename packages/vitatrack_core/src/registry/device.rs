//! Device record and value types
//!
//! A device is one paired or saved health peripheral. Identity, descriptive
//! fields, category, and MAC address are fixed at creation; connection state,
//! battery, and last sync time change over the device's life.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::RegistryError;

/// Purpose of a device. Closed set; the "all devices" pseudo-category is a
/// filter concern and lives in `CategoryFilter`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DeviceCategory {
    BloodPressure,
    Glucometer,
    Thermometer,
    Scale,
    PulseOximeter,
    Ecg,
}

impl DeviceCategory {
    /// Every storable category, in picker order.
    pub const ALL: [DeviceCategory; 6] = [
        DeviceCategory::BloodPressure,
        DeviceCategory::Glucometer,
        DeviceCategory::Thermometer,
        DeviceCategory::Scale,
        DeviceCategory::PulseOximeter,
        DeviceCategory::Ecg,
    ];

    /// Stable tag, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::BloodPressure => "bloodPressure",
            DeviceCategory::Glucometer => "glucometer",
            DeviceCategory::Thermometer => "thermometer",
            DeviceCategory::Scale => "scale",
            DeviceCategory::PulseOximeter => "pulseOximeter",
            DeviceCategory::Ecg => "ecg",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        DeviceCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown device category: {}", s))
    }
}

/// Battery charge in percent, always within 0..=100.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Levels below this are flagged as low.
    pub const LOW_THRESHOLD: u8 = 20;

    pub fn new(percent: u8) -> Result<Self, RegistryError> {
        if percent > 100 {
            return Err(RegistryError::InvalidBatteryLevel(percent));
        }
        Ok(Self(percent))
    }

    /// Clamp to 100 instead of rejecting.
    pub const fn saturating(percent: u8) -> Self {
        if percent > 100 {
            Self(100)
        } else {
            Self(percent)
        }
    }

    /// Random level in 30..=100, the range freshly added devices report.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(30..=100))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    pub fn is_low(&self) -> bool {
        self.0 < Self::LOW_THRESHOLD
    }

    /// Quarter bucket for battery icons: 25, 50, 75 or 100.
    pub fn tier(&self) -> u8 {
        match self.0 {
            0..=25 => 25,
            26..=50 => 50,
            51..=75 => 75,
            _ => 100,
        }
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = RegistryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BatteryLevel::new(value)
    }
}

impl From<BatteryLevel> for u8 {
    fn from(level: BatteryLevel) -> Self {
        level.0
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A 6-byte hardware address, rendered as `XX:XX:XX:XX:XX:XX` in uppercase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 6];
        rng.fill(&mut bytes);
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.0.iter().map(|b| hex::encode_upper([*b])).collect();
        f.write_str(&pairs.join(":"))
    }
}

impl FromStr for MacAddress {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RegistryError::InvalidMacAddress(s.to_string());

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 6];
        for (slot, part) in bytes.iter_mut().zip(&parts) {
            if part.len() != 2 {
                return Err(invalid());
            }
            let decoded = hex::decode(part).map_err(|_| invalid())?;
            *slot = decoded[0];
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

/// A paired or saved health peripheral.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub category: DeviceCategory,
    pub is_connected: bool,
    pub battery_level: BatteryLevel,
    /// Set each time the device reaches the connected state.
    pub last_sync_date: Option<DateTime<Utc>>,
    pub mac_address: MacAddress,
}

impl Device {
    /// A device that has never connected.
    pub fn new(
        id: String,
        name: String,
        model: String,
        manufacturer: String,
        category: DeviceCategory,
        battery_level: BatteryLevel,
        mac_address: MacAddress,
    ) -> Self {
        Self {
            id,
            name,
            model,
            manufacturer,
            category,
            is_connected: false,
            battery_level,
            last_sync_date: None,
            mac_address,
        }
    }
}
