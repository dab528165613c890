//! Static device catalog
//!
//! Display metadata per category, the manufacturer/model picker used when
//! adding a device, and the sample devices a fresh registry starts with.
//! Presentation data lives here so `DeviceCategory` stays a plain domain enum.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::registry::device::{BatteryLevel, Device, DeviceCategory, MacAddress};
use crate::registry::filter::CategoryFilter;

/// How a category is shown to users.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryInfo {
    pub filter: CategoryFilter,
    pub display_name: &'static str,
    /// SF Symbols name.
    pub icon: &'static str,
    pub color: &'static str,
}

static CATEGORY_INFO: [CategoryInfo; 7] = [
    CategoryInfo {
        filter: CategoryFilter::All,
        display_name: "全部",
        icon: "heart.text.square",
        color: "gray",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::BloodPressure),
        display_name: "血压计",
        icon: "heart.circle",
        color: "red",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::Glucometer),
        display_name: "血糖仪",
        icon: "drop.circle",
        color: "blue",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::Thermometer),
        display_name: "体温计",
        icon: "thermometer",
        color: "orange",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::Scale),
        display_name: "体重秤",
        icon: "scalemass",
        color: "purple",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::PulseOximeter),
        display_name: "血氧仪",
        icon: "lungs",
        color: "indigo",
    },
    CategoryInfo {
        filter: CategoryFilter::Category(DeviceCategory::Ecg),
        display_name: "心电图",
        icon: "waveform.path.ecg",
        color: "green",
    },
];

/// Display metadata for a category filter, including `All`.
pub fn category_info(filter: CategoryFilter) -> &'static CategoryInfo {
    let index = match filter {
        CategoryFilter::All => 0,
        CategoryFilter::Category(DeviceCategory::BloodPressure) => 1,
        CategoryFilter::Category(DeviceCategory::Glucometer) => 2,
        CategoryFilter::Category(DeviceCategory::Thermometer) => 3,
        CategoryFilter::Category(DeviceCategory::Scale) => 4,
        CategoryFilter::Category(DeviceCategory::PulseOximeter) => 5,
        CategoryFilter::Category(DeviceCategory::Ecg) => 6,
    };
    &CATEGORY_INFO[index]
}

/// Every category's metadata, `All` first.
pub fn all_category_info() -> &'static [CategoryInfo] {
    &CATEGORY_INFO
}

/// Manufacturers offered for a category.
pub fn manufacturers(category: DeviceCategory) -> &'static [&'static str] {
    match category {
        DeviceCategory::BloodPressure => &["欧姆龙", "鱼跃", "小米", "松下", "乐心"],
        DeviceCategory::Glucometer => &["强生", "雅培", "三诺", "欧姆龙"],
        DeviceCategory::Thermometer => &["小米", "鱼跃", "华为", "欧姆龙"],
        DeviceCategory::Scale => &["小米", "华为", "乐心", "PICOOC"],
        DeviceCategory::PulseOximeter => &["鱼跃", "康泰", "欧姆龙"],
        DeviceCategory::Ecg => &["Apple", "华为", "小米", "Withings"],
    }
}

const GENERIC_MODELS: &[&str] = &["标准型号", "高级型号", "专业型号"];

const KNOWN_MODELS: &[(&str, DeviceCategory, &[&str])] = &[
    (
        "欧姆龙",
        DeviceCategory::BloodPressure,
        &["HEM-7156", "HEM-7320", "HEM-8732T", "HEM-7136"],
    ),
    (
        "小米",
        DeviceCategory::BloodPressure,
        &["iHealth 智能血压计", "米家血压计2", "米家血压计"],
    ),
    ("欧姆龙", DeviceCategory::Glucometer, &["HGM-114", "HGM-121"]),
    (
        "小米",
        DeviceCategory::Thermometer,
        &["米家电子体温计", "米家红外体温计"],
    ),
];

/// Models a manufacturer offers in a category. Pairs without a dedicated
/// line-up get the generic tiers.
pub fn models(manufacturer: &str, category: DeviceCategory) -> &'static [&'static str] {
    KNOWN_MODELS
        .iter()
        .find(|(m, c, _)| *m == manufacturer && *c == category)
        .map(|(_, _, models)| *models)
        .unwrap_or(GENERIC_MODELS)
}

struct Sample {
    id: &'static str,
    name: &'static str,
    model: &'static str,
    manufacturer: &'static str,
    category: DeviceCategory,
    connected: bool,
    battery: u8,
    synced_minutes_ago: i64,
    mac: [u8; 6],
}

const SAMPLES: [Sample; 3] = [
    Sample {
        id: "1",
        name: "欧姆龙血压计",
        model: "HEM-7156",
        manufacturer: "欧姆龙",
        category: DeviceCategory::BloodPressure,
        connected: true,
        battery: 85,
        synced_minutes_ago: 60,
        mac: [0xB4, 0xC3, 0xD2, 0xE1, 0xF0, 0xA9],
    },
    Sample {
        id: "2",
        name: "强生血糖仪",
        model: "OneTouch",
        manufacturer: "强生",
        category: DeviceCategory::Glucometer,
        connected: false,
        battery: 45,
        synced_minutes_ago: 24 * 60,
        mac: [0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6],
    },
    Sample {
        id: "3",
        name: "小米体重秤",
        model: "体脂秤2",
        manufacturer: "小米",
        category: DeviceCategory::Scale,
        connected: false,
        battery: 12,
        synced_minutes_ago: 3 * 24 * 60,
        mac: [0xF6, 0xE5, 0xD4, 0xC3, 0xB2, 0xA1],
    },
];

/// The devices a fresh registry is seeded with. The first is connected and
/// each carries a historic sync time relative to `now`.
pub fn sample_devices(now: DateTime<Utc>) -> Vec<Device> {
    SAMPLES
        .iter()
        .map(|s| Device {
            id: s.id.to_string(),
            name: s.name.to_string(),
            model: s.model.to_string(),
            manufacturer: s.manufacturer.to_string(),
            category: s.category,
            is_connected: s.connected,
            battery_level: BatteryLevel::saturating(s.battery),
            last_sync_date: Some(now - Duration::minutes(s.synced_minutes_ago)),
            mac_address: MacAddress::new(s.mac),
        })
        .collect()
}
