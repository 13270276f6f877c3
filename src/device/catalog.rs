//! Known device profiles.
//!
//! Android profiles are keyed by the name an operator may put in
//! `DevicePackageName`; iOS profiles are only ever picked at random.

use std::collections::BTreeMap;

use crate::config::model::DeviceConfig;

/// Full attribute set of one concrete device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub android_board_name: String,
    pub android_bootloader: String,
    pub device_brand: String,
    pub device_model: String,
    pub device_model_boot: String,
    pub device_model_identifier: String,
    pub firmware_brand: String,
    pub firmware_fingerprint: String,
    pub firmware_tags: String,
    pub firmware_type: String,
    pub hardware_manufacturer: String,
    pub hardware_model: String,
}

impl DeviceInfo {
    /// Copies every attribute, id included, onto `device`.
    pub fn apply_to(&self, device: &mut DeviceConfig) {
        device.device_id = self.device_id.clone();
        device.android_board_name = self.android_board_name.clone();
        device.android_bootloader = self.android_bootloader.clone();
        device.device_brand = self.device_brand.clone();
        device.device_model = self.device_model.clone();
        device.device_model_boot = self.device_model_boot.clone();
        device.device_model_identifier = self.device_model_identifier.clone();
        device.firmware_brand = self.firmware_brand.clone();
        device.firmware_fingerprint = self.firmware_fingerprint.clone();
        device.firmware_tags = self.firmware_tags.clone();
        device.firmware_type = self.firmware_type.clone();
        device.hardware_manufacturer = self.hardware_manufacturer.clone();
        device.hardware_model = self.hardware_model.clone();
    }

    /// True when every attribute of `device`, id included, equals this profile.
    pub fn matches(&self, device: &DeviceConfig) -> bool {
        self.device_id == device.device_id && self.matches_ignoring_id(device)
    }

    /// True when every attribute except the id equals this profile.
    pub fn matches_ignoring_id(&self, device: &DeviceConfig) -> bool {
        self.android_board_name == device.android_board_name
            && self.android_bootloader == device.android_bootloader
            && self.device_brand == device.device_brand
            && self.device_model == device.device_model
            && self.device_model_boot == device.device_model_boot
            && self.device_model_identifier == device.device_model_identifier
            && self.firmware_brand == device.firmware_brand
            && self.firmware_fingerprint == device.firmware_fingerprint
            && self.firmware_tags == device.firmware_tags
            && self.firmware_type == device.firmware_type
            && self.hardware_manufacturer == device.hardware_manufacturer
            && self.hardware_model == device.hardware_model
    }
}

/// Read-only lookup tables consumed by the resolver.
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    android: BTreeMap<String, DeviceInfo>,
    ios: Vec<DeviceInfo>,
}

impl DeviceCatalog {
    pub fn new(android: BTreeMap<String, DeviceInfo>, ios: Vec<DeviceInfo>) -> Self {
        Self { android, ios }
    }

    /// Profiles shipped with the client.
    pub fn builtin() -> Self {
        Self::new(builtin_android(), builtin_ios())
    }

    pub fn android(&self, key: &str) -> Option<&DeviceInfo> {
        self.android.get(key)
    }

    pub fn android_keys(&self) -> impl Iterator<Item = &str> {
        self.android.keys().map(String::as_str)
    }

    pub fn ios(&self) -> &[DeviceInfo] {
        &self.ios
    }
}

#[allow(clippy::too_many_arguments)]
fn android(
    device_id: &str,
    board: &str,
    bootloader: &str,
    brand: &str,
    model: &str,
    model_boot: &str,
    model_identifier: &str,
    fingerprint: &str,
    hardware_model: &str,
) -> DeviceInfo {
    DeviceInfo {
        device_id: device_id.to_string(),
        android_board_name: board.to_string(),
        android_bootloader: bootloader.to_string(),
        device_brand: brand.to_string(),
        device_model: model.to_string(),
        device_model_boot: model_boot.to_string(),
        device_model_identifier: model_identifier.to_string(),
        firmware_brand: model.to_string(),
        firmware_fingerprint: fingerprint.to_string(),
        firmware_tags: "release-keys".to_string(),
        firmware_type: "user".to_string(),
        hardware_manufacturer: brand.to_string(),
        hardware_model: hardware_model.to_string(),
    }
}

fn builtin_android() -> BTreeMap<String, DeviceInfo> {
    let mut table = BTreeMap::new();
    table.insert(
        "galaxy6".to_string(),
        android(
            "a3b0f1c27d5e8493",
            "universal7420",
            "G920FXXU3DPEK",
            "samsung",
            "zerofltexx",
            "samsungexynos7420",
            "zerofltexx_G920F_24_160603",
            "samsung/zerofltexx/zeroflte:6.0.1/MMB29K/G920FXXU3DPEK:user/release-keys",
            "SM-G920F",
        ),
    );
    table.insert(
        "htc10".to_string(),
        android(
            "5f2d9c8e1a4b7036",
            "msm8996",
            "1.19.0000",
            "htc",
            "pmewl_00531",
            "qcom",
            "pmewl_00531_24_160612",
            "htc/pmewl_00531/htc_pmewl:6.0.1/MMB29M/770927.1:user/release-keys",
            "HTC 10",
        ),
    );
    table.insert(
        "lg-g3".to_string(),
        android(
            "9e41a07c3b6d2f85",
            "MSM8974",
            "unknown",
            "lge",
            "g3_global_com",
            "qcom",
            "g3_global_com_23_160401",
            "lge/g3_global_com/g3:6.0/MRA58K/1601215569825:user/release-keys",
            "LG-D855",
        ),
    );
    table.insert(
        "nexus5".to_string(),
        android(
            "0c8e3f5a9d71b246",
            "hammerhead",
            "HHZ20h",
            "google",
            "hammerhead",
            "qcom",
            "hammerhead_23_151205",
            "google/hammerhead/hammerhead:6.0.1/MMB29K/2419427:user/release-keys",
            "Nexus 5",
        ),
    );
    table.insert(
        "nexus7gen2".to_string(),
        android(
            "d6f24b90e3a15c78",
            "flo",
            "FLO-04.07",
            "google",
            "razor",
            "qcom",
            "razor_23_160112",
            "google/razor/flo:6.0.1/MOB30X/3036618:user/release-keys",
            "Nexus 7",
        ),
    );
    table.insert(
        "oneplus3t".to_string(),
        android(
            "47b1e9d02c6fa358",
            "msm8996",
            "unknown",
            "OnePlus",
            "OnePlus3T",
            "qcom",
            "ONEPLUS A3003_28_161227",
            "OnePlus/OnePlus3/OnePlus3T:7.0/NRD90M/12271530:user/release-keys",
            "ONEPLUS A3003",
        ),
    );
    table
}

fn ios(device_id: &str, model_boot: &str, hardware_model: &str, firmware: &str) -> DeviceInfo {
    DeviceInfo {
        device_id: device_id.to_string(),
        android_board_name: String::new(),
        android_bootloader: String::new(),
        device_brand: "Apple".to_string(),
        device_model: "iPhone".to_string(),
        device_model_boot: model_boot.to_string(),
        device_model_identifier: String::new(),
        firmware_brand: "iPhone OS".to_string(),
        firmware_fingerprint: String::new(),
        firmware_tags: String::new(),
        firmware_type: firmware.to_string(),
        hardware_manufacturer: "Apple".to_string(),
        hardware_model: hardware_model.to_string(),
    }
}

fn builtin_ios() -> Vec<DeviceInfo> {
    vec![
        ios("8f1e62d4a0b93c57", "iPhone7,2", "N61AP", "9.3.3"),
        ios("2b7c05e9f4d186a3", "iPhone8,1", "N71AP", "10.1.1"),
        ios("e0d39a7b15c4f862", "iPhone9,3", "D101AP", "10.2"),
        ios("71c4b8e2096fda35", "iPhone9,4", "D111AP", "10.2.1"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_populated() {
        let catalog = DeviceCatalog::builtin();
        assert!(catalog.android_keys().count() >= 2);
        assert!(!catalog.ios().is_empty());
        assert!(catalog.android("nexus5").is_some());
        assert!(catalog.android("Nexus5").is_none());
    }

    #[test]
    fn test_profile_ids_are_hex() {
        let catalog = DeviceCatalog::builtin();
        let ids = catalog
            .android_keys()
            .filter_map(|k| catalog.android(k))
            .chain(catalog.ios())
            .map(|info| info.device_id.as_str());
        for id in ids {
            assert_eq!(id.len(), 16);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_apply_to_copies_everything() {
        let catalog = DeviceCatalog::builtin();
        let info = catalog.android("htc10").unwrap();
        let mut device = DeviceConfig::default();
        info.apply_to(&mut device);
        assert!(info.matches(&device));
        assert_eq!(device.hardware_model, "HTC 10");
    }
}
