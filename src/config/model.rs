//! Settings document model.
//!
//! This module defines the three value structures persisted in `auth.json`.
//! All types derive Serde traits; member names are PascalCase on disk and
//! enumerations are written as lowercase strings.
//!
//! Declared defaults live in the `Default` impls and are applied once when
//! the owning `AuthSettings` is constructed.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::proxy::ProxyError;

/// Device id shipped in old default documents. Treated as unset.
pub const PLACEHOLDER_DEVICE_ID: &str = "8525f5d8201f78b5";

/// Authentication provider selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AuthType {
    #[default]
    Google,
    Ptc,
}

impl<'de> Deserialize<'de> for AuthType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "google" => Ok(AuthType::Google),
            "ptc" => Ok(AuthType::Ptc),
            other => Err(de::Error::unknown_variant(other, &["google", "ptc"])),
        }
    }
}

/// Credentials for both providers; only the one named by `auth_type` is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthConfig {
    pub auth_type: AuthType,
    pub google_username: Option<String>,
    pub google_password: Option<String>,
    pub ptc_username: Option<String>,
    pub ptc_password: Option<String>,
}

impl AuthConfig {
    /// Username and password of the active provider.
    pub fn credentials(&self) -> (Option<&str>, Option<&str>) {
        match self.auth_type {
            AuthType::Google => (
                self.google_username.as_deref(),
                self.google_password.as_deref(),
            ),
            AuthType::Ptc => (self.ptc_username.as_deref(), self.ptc_password.as_deref()),
        }
    }
}

/// Outbound proxy settings. Every field but `use_proxy` is inert while it is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProxyConfig {
    pub use_proxy: bool,
    pub use_proxy_host: Option<String>,
    #[serde(deserialize_with = "deserialize_port")]
    pub use_proxy_port: Option<u16>,
    pub use_proxy_authentication: bool,
    pub use_proxy_username: Option<String>,
    pub use_proxy_password: Option<String>,
}

impl ProxyConfig {
    /// Proxy URL in `http://host:port` form.
    ///
    /// Returns `Ok(None)` when proxying is disabled.
    pub fn proxy_url(&self) -> Result<Option<url::Url>, ProxyError> {
        if !self.use_proxy {
            return Ok(None);
        }

        let host = self
            .use_proxy_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ProxyError::InvalidProxy("UseProxyHost is not set".to_string()))?;
        let port = self
            .use_proxy_port
            .ok_or_else(|| ProxyError::InvalidProxy("UseProxyPort is not set".to_string()))?;

        let raw = format!("http://{}:{}", host.trim(), port);
        url::Url::parse(&raw)
            .map(Some)
            .map_err(|e| ProxyError::InvalidProxy(format!("'{}': {}", raw, e)))
    }

    /// Credentials to present to the proxy, if authentication is enabled.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.use_proxy_authentication {
            return None;
        }
        Some((
            self.use_proxy_username.as_deref().unwrap_or_default(),
            self.use_proxy_password.as_deref().unwrap_or_default(),
        ))
    }
}

/// Accepts `8080`, `"8080"` or null. Older documents stored the port as text.
fn deserialize_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    struct PortVisitor;

    impl Visitor<'_> for PortVisitor {
        type Value = Option<u16>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a port number between 0 and 65535, or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            u16::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u16::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u16>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

/// Simulated device platform. Anything other than `ios` is resolved as Android.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DevicePlatform {
    #[default]
    Android,
    Ios,
}

impl<'de> Deserialize<'de> for DevicePlatform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("ios") {
            Ok(DevicePlatform::Ios)
        } else {
            Ok(DevicePlatform::Android)
        }
    }
}

/// Value of `DevicePackageName`: what the resolver should do with the device block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PackageSelector {
    /// Pick a known profile at random.
    #[default]
    Random,
    /// Keep the operator-supplied attributes.
    Custom,
    /// Key into the Android profile table.
    Named(String),
}

impl PackageSelector {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("random") {
            PackageSelector::Random
        } else if raw.eq_ignore_ascii_case("custom") {
            PackageSelector::Custom
        } else {
            PackageSelector::Named(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PackageSelector::Random => "random",
            PackageSelector::Custom => "custom",
            PackageSelector::Named(name) => name,
        }
    }
}

impl fmt::Display for PackageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PackageSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PackageSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SelectorVisitor;

        impl Visitor<'_> for SelectorVisitor {
            type Value = PackageSelector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("'random', 'custom' or a device profile name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(PackageSelector::parse(v))
            }
        }

        deserializer.deserialize_str(SelectorVisitor)
    }
}

/// Simulated device identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceConfig {
    pub device_platform: DevicePlatform,
    pub device_package_name: PackageSelector,
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

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_platform: DevicePlatform::Android,
            device_package_name: PackageSelector::Random,
            device_id: PLACEHOLDER_DEVICE_ID.to_string(),
            android_board_name: "msm8994".to_string(),
            android_bootloader: "unknown".to_string(),
            device_brand: "OnePlus".to_string(),
            device_model: "OnePlus2".to_string(),
            device_model_boot: "qcom".to_string(),
            device_model_identifier: "ONE A2003_24_160604".to_string(),
            firmware_brand: "OnePlus2".to_string(),
            firmware_fingerprint:
                "OnePlus/OnePlus2/OnePlus2:6.0.1/MMB29M/1447840820:user/release-keys".to_string(),
            firmware_tags: "release-keys".to_string(),
            firmware_type: "user".to_string(),
            hardware_manufacturer: "OnePlus".to_string(),
            hardware_model: "ONE A2003".to_string(),
        }
    }
}

impl DeviceConfig {
    /// True when the id must be regenerated before use.
    pub fn needs_device_id(&self) -> bool {
        self.device_id.is_empty() || self.device_id == PLACEHOLDER_DEVICE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.auth_type, AuthType::Google);
        assert!(auth.google_username.is_none());

        let proxy = ProxyConfig::default();
        assert!(!proxy.use_proxy);
        assert!(!proxy.use_proxy_authentication);

        let device = DeviceConfig::default();
        assert_eq!(device.device_platform, DevicePlatform::Android);
        assert_eq!(device.device_package_name, PackageSelector::Random);
        assert_eq!(device.device_id, PLACEHOLDER_DEVICE_ID);
        assert!(device.needs_device_id());
    }

    #[test]
    fn test_enums_match_case_insensitively() {
        let auth: AuthConfig = serde_json::from_str(r#"{"AuthType": "PTC"}"#).unwrap();
        assert_eq!(auth.auth_type, AuthType::Ptc);

        let device: DeviceConfig =
            serde_json::from_str(r#"{"DevicePlatform": "IOS", "DevicePackageName": "Custom"}"#)
                .unwrap();
        assert_eq!(device.device_platform, DevicePlatform::Ios);
        assert_eq!(device.device_package_name, PackageSelector::Custom);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        let json = serde_json::to_value(AuthConfig {
            auth_type: AuthType::Ptc,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["AuthType"], "ptc");

        let json = serde_json::to_value(DeviceConfig {
            device_platform: DevicePlatform::Ios,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["DevicePlatform"], "ios");
        assert_eq!(json["DevicePackageName"], "random");
    }

    #[test]
    fn test_proxy_port_accepts_quoted_number() {
        let proxy: ProxyConfig = serde_json::from_str(r#"{"UseProxyPort": "8080"}"#).unwrap();
        assert_eq!(proxy.use_proxy_port, Some(8080));

        let proxy: ProxyConfig = serde_json::from_str(r#"{"UseProxyPort": 3128}"#).unwrap();
        assert_eq!(proxy.use_proxy_port, Some(3128));

        let proxy: ProxyConfig = serde_json::from_str(r#"{"UseProxyPort": " "}"#).unwrap();
        assert_eq!(proxy.use_proxy_port, None);

        let proxy: ProxyConfig = serde_json::from_str(r#"{"UseProxyPort": null}"#).unwrap();
        assert_eq!(proxy.use_proxy_port, None);
    }

    #[test]
    fn test_proxy_port_out_of_range_is_rejected() {
        for raw in [r#""http""#, "70000", "-1", r#""70000""#] {
            let text = format!(r#"{{"UseProxyPort": {}}}"#, raw);
            let result: Result<ProxyConfig, _> = serde_json::from_str(&text);
            assert!(result.is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_unknown_auth_type_is_rejected() {
        let result: Result<AuthConfig, _> = serde_json::from_str(r#"{"AuthType": "facebook"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_named_selector_keeps_case() {
        assert_eq!(
            PackageSelector::parse("OnePlus3T"),
            PackageSelector::Named("OnePlus3T".to_string())
        );
        assert_eq!(PackageSelector::parse("RANDOM"), PackageSelector::Random);
    }

    #[test]
    fn test_active_credentials() {
        let auth = AuthConfig {
            auth_type: AuthType::Ptc,
            google_username: Some("g@example.com".into()),
            google_password: Some("gpass".into()),
            ptc_username: Some("trainer".into()),
            ptc_password: Some("secret".into()),
        };
        assert_eq!(auth.credentials(), (Some("trainer"), Some("secret")));
    }

    #[test]
    fn test_proxy_url() {
        let mut proxy = ProxyConfig::default();
        assert!(proxy.proxy_url().unwrap().is_none());

        proxy.use_proxy = true;
        assert!(matches!(proxy.proxy_url(), Err(ProxyError::InvalidProxy(_))));

        proxy.use_proxy_host = Some("10.0.0.2".into());
        proxy.use_proxy_port = Some(3128);
        let url = proxy.proxy_url().unwrap().unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:3128/");
    }

    #[test]
    fn test_proxy_credentials_only_with_authentication() {
        let mut proxy = ProxyConfig {
            use_proxy: true,
            use_proxy_username: Some("user".into()),
            use_proxy_password: Some("pass".into()),
            ..Default::default()
        };
        assert!(proxy.credentials().is_none());

        proxy.use_proxy_authentication = true;
        assert_eq!(proxy.credentials(), Some(("user", "pass")));
    }
}
