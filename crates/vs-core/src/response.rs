//! Decoded device responses

use std::collections::HashMap;

/// Well-known response keys
pub mod keys {
    pub const API_STATUS: &str = "API.STATUS";
    pub const STREAM_HOST: &str = "STREAM.HOST";
    pub const UNIT_MODEL: &str = "UNIT.MODEL";
    pub const UNIT_FIRMWARE: &str = "UNIT.FIRMWARE";
    pub const UNIT_FIRMWARE_DATE: &str = "UNIT.FIRMWARE_DATE";
    pub const IP_ADDRESS: &str = "IP.ADDRESS";
    pub const UNIT_MAC_ADDRESS: &str = "UNIT.MAC_ADDRESS";
    pub const VIDEO_TIMING: &str = "VIDEO.TIMING";
}

/// Key/value fields returned by a device for a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceResponse {
    fields: HashMap<String, String>,
}

impl DeviceResponse {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of `key`, if the device returned it
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key`, or an empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for DeviceResponse {
    fn from(fields: HashMap<String, String>) -> Self {
        Self::new(fields)
    }
}
