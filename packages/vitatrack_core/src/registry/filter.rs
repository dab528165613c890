//! Read-only views over the device set
//!
//! Views are built from a snapshot taken at call time and never cache.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::device::{Device, DeviceCategory};
use super::device_store::DeviceStore;

/// Category selector. `All` is the pseudo-category that matches every device.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(DeviceCategory),
}

impl CategoryFilter {
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => device.category == *category,
        }
    }

    /// Devices from `devices` that pass this filter, order preserved.
    pub fn apply<'a, I>(&self, devices: I) -> DeviceView
    where
        I: IntoIterator<Item = &'a Device>,
    {
        DeviceView {
            devices: devices
                .into_iter()
                .filter(|d| self.matches(d))
                .cloned()
                .collect(),
        }
    }

    /// Filter the store's current contents.
    pub fn by_category(&self, store: &DeviceStore) -> DeviceView {
        self.apply(store.iter())
    }
}

impl From<DeviceCategory> for CategoryFilter {
    fn from(category: DeviceCategory) -> Self {
        CategoryFilter::Category(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<DeviceCategory>().map(CategoryFilter::Category)
    }
}

/// A filtered snapshot of devices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceView {
    devices: Vec<Device>,
}

impl DeviceView {
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn into_devices(self) -> Vec<Device> {
        self.devices
    }

    /// Devices currently connected.
    pub fn connected(&self) -> Vec<&Device> {
        self.devices.iter().filter(|d| d.is_connected).collect()
    }

    /// Saved devices that are not connected.
    pub fn disconnected(&self) -> Vec<&Device> {
        self.devices.iter().filter(|d| !d.is_connected).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::device::{BatteryLevel, MacAddress};

    fn make_device(id: &str, category: DeviceCategory, connected: bool) -> Device {
        let mut device = Device::new(
            id.to_string(),
            id.to_string(),
            "model".to_string(),
            "maker".to_string(),
            category,
            BatteryLevel::new(60).unwrap(),
            MacAddress::new([9, 9, 9, 9, 9, 9]),
        );
        device.is_connected = connected;
        device
    }

    fn populated_store() -> DeviceStore {
        let mut store = DeviceStore::new();
        store
            .add(make_device("bp1", DeviceCategory::BloodPressure, true))
            .unwrap();
        store
            .add(make_device("glu", DeviceCategory::Glucometer, false))
            .unwrap();
        store
            .add(make_device("bp2", DeviceCategory::BloodPressure, false))
            .unwrap();
        store
            .add(make_device("scale", DeviceCategory::Scale, true))
            .unwrap();
        store
    }

    fn ids(devices: &[&Device]) -> Vec<String> {
        devices.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_all_matches_list() {
        let store = populated_store();
        let view = CategoryFilter::All.by_category(&store);
        assert_eq!(view.devices(), store.list().as_slice());
    }

    #[test]
    fn test_single_category() {
        let store = populated_store();
        let view = CategoryFilter::Category(DeviceCategory::BloodPressure).by_category(&store);

        assert_eq!(view.len(), 2);
        assert!(view
            .devices()
            .iter()
            .all(|d| d.category == DeviceCategory::BloodPressure));

        let empty = CategoryFilter::Category(DeviceCategory::Ecg).by_category(&store);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_union_of_categories_is_everything() {
        let store = populated_store();

        let mut union: Vec<Device> = DeviceCategory::ALL
            .into_iter()
            .flat_map(|c| CategoryFilter::from(c).by_category(&store).into_devices())
            .collect();
        union.sort_by(|a, b| a.id.cmp(&b.id));

        let mut all = store.list();
        all.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(union, all);
    }

    #[test]
    fn test_connected_partition() {
        let store = populated_store();

        let view = CategoryFilter::All.by_category(&store);
        assert_eq!(ids(&view.connected()), vec!["bp1", "scale"]);
        assert_eq!(ids(&view.disconnected()), vec!["glu", "bp2"]);

        let bp = CategoryFilter::Category(DeviceCategory::BloodPressure).by_category(&store);
        assert_eq!(ids(&bp.connected()), vec!["bp1"]);
        assert_eq!(ids(&bp.disconnected()), vec!["bp2"]);
    }

    #[test]
    fn test_view_reflects_store_at_call_time() {
        let mut store = populated_store();
        let before = CategoryFilter::All.by_category(&store);

        store.find_mut("glu").unwrap().is_connected = true;
        let after = CategoryFilter::All.by_category(&store);

        assert_eq!(before.connected().len(), 2);
        assert_eq!(after.connected().len(), 3);
    }

    #[test]
    fn test_filter_parse_and_display() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "scale".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Category(DeviceCategory::Scale))
        );
        assert!("toaster".parse::<CategoryFilter>().is_err());

        assert_eq!(CategoryFilter::All.to_string(), "all");
        assert_eq!(
            CategoryFilter::Category(DeviceCategory::PulseOximeter).to_string(),
            "pulseOximeter"
        );
    }
}
