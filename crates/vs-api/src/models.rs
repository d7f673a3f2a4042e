//! JSON response bodies
//!
//! Shapes match what existing AV control clients already consume.

use serde::{Deserialize, Serialize};
use vs_core::{keys, DeviceResponse};

/// Current input of a decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub input: String,
}

/// Whether a device currently sees a video signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSignal {
    pub active_signal: bool,
}

/// Value reported in `VIDEO.TIMING` when no signal is present
pub const NO_SIGNAL_TIMING: &str = "Not Available";

impl ActiveSignal {
    pub fn from_response(response: &DeviceResponse) -> Self {
        Self {
            active_signal: response.get(keys::VIDEO_TIMING) != Some(NO_SIGNAL_TIMING),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
}

/// Hardware details of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firmware_version: String,
    #[serde(rename = "network_information", default)]
    pub network_info: NetworkInfo,
    /// Devices do not report uptime/power, always empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub power_status: String,
}

impl HardwareInfo {
    pub fn from_response(response: &DeviceResponse) -> Self {
        Self {
            model_name: response.get_or_empty(keys::UNIT_MODEL).to_string(),
            build_date: response.get_or_empty(keys::UNIT_FIRMWARE_DATE).to_string(),
            firmware_version: response.get_or_empty(keys::UNIT_FIRMWARE).to_string(),
            network_info: NetworkInfo {
                ip_address: response.get_or_empty(keys::IP_ADDRESS).to_string(),
                mac_address: response.get_or_empty(keys::UNIT_MAC_ADDRESS).to_string(),
            },
            power_status: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(pairs: &[(&str, &str)]) -> DeviceResponse {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn test_signal_not_available() {
        let signal = ActiveSignal::from_response(&response(&[("VIDEO.TIMING", "Not Available")]));
        assert!(!signal.active_signal);
    }

    #[test]
    fn test_signal_present() {
        let signal = ActiveSignal::from_response(&response(&[("VIDEO.TIMING", "1920x1080p60")]));
        assert!(signal.active_signal);
    }

    #[test]
    fn test_hardware_info_omits_missing_fields() {
        let info = HardwareInfo::from_response(&response(&[
            ("UNIT.MODEL", "VS-2000"),
            ("UNIT.MAC_ADDRESS", "00:11:22:33:44:55"),
        ]));

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "model_name": "VS-2000",
                "network_information": { "mac_address": "00:11:22:33:44:55" }
            })
        );
    }
}
