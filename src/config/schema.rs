//! JSON schema for the settings document.
//!
//! The schema mirrors the structures in [`crate::config::model`] and is used
//! for operator diagnostics only; deserialization never consults it.

use serde_json::{json, Map, Value};

const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Returns the schema for `auth.json`.
#[must_use]
pub fn settings_schema() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DRAFT,
        "title": "AuthSettings",
        "description": "Set your authentication settings.",
        "type": "object",
        "additionalProperties": false,
        "required": ["AuthConfig", "ProxyConfig", "DeviceConfig"],
        "properties": {
            "AuthConfig": auth_schema(),
            "ProxyConfig": proxy_schema(),
            "DeviceConfig": device_schema(),
        }
    })
}

/// Renders the schema the way it is written next to the settings file.
pub fn render_schema(schema: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(schema)
}

fn auth_schema() -> Value {
    json!({
        "title": "AuthConfig",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "AuthType": string_enum(&["google", "ptc"]),
            "GoogleUsername": nullable_string(),
            "GooglePassword": nullable_string(),
            "PtcUsername": nullable_string(),
            "PtcPassword": nullable_string(),
        }
    })
}

fn proxy_schema() -> Value {
    json!({
        "title": "ProxyConfig",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "UseProxy": { "type": "boolean" },
            "UseProxyHost": nullable_string(),
            "UseProxyPort": {
                "type": ["integer", "null"],
                "minimum": 0,
                "maximum": 65535
            },
            "UseProxyAuthentication": { "type": "boolean" },
            "UseProxyUsername": nullable_string(),
            "UseProxyPassword": nullable_string(),
        }
    })
}

fn device_schema() -> Value {
    let mut properties = Map::new();
    // Matched case-insensitively on load, and anything but `ios` means Android.
    properties.insert("DevicePlatform".into(), json!({ "type": "string" }));
    properties.insert("DevicePackageName".into(), json!({ "type": "string" }));
    for name in [
        "DeviceId",
        "AndroidBoardName",
        "AndroidBootloader",
        "DeviceBrand",
        "DeviceModel",
        "DeviceModelBoot",
        "DeviceModelIdentifier",
        "FirmwareBrand",
        "FirmwareFingerprint",
        "FirmwareTags",
        "FirmwareType",
        "HardwareManufacturer",
        "HardwareModel",
    ] {
        properties.insert(name.into(), json!({ "type": "string" }));
    }

    json!({
        "title": "DeviceConfig",
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
    })
}

fn string_enum(values: &[&str]) -> Value {
    json!({ "type": "string", "enum": values })
}

fn nullable_string() -> Value {
    json!({ "type": ["string", "null"] })
}
