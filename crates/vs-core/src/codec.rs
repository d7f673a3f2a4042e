//! Response body decoding and status classification

use std::collections::HashMap;

use tracing::debug;

use crate::response::keys;

/// Outcome reported by a device in its `API.STATUS` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

/// Decode a `KEY=VALUE&KEY=VALUE` response body.
///
/// Segments without exactly one `=` are dropped, as are empty segments. If a
/// key repeats, the last occurrence wins.
pub fn decode(body: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut dropped = 0usize;

    for segment in body.split('&').filter(|s| !s.is_empty()) {
        let mut parts = segment.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                fields.insert(key.to_string(), value.to_string());
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(
            dropped,
            kept = fields.len(),
            "Dropped malformed segments from device response"
        );
    }

    fields
}

/// Classify decoded fields: success iff `API.STATUS` contains `SUCCESS`.
///
/// Firmware sometimes wraps the status in extra text, so this is a substring
/// match rather than equality.
pub fn classify(fields: &HashMap<String, String>) -> Status {
    match fields.get(keys::API_STATUS) {
        Some(status) if status.contains("SUCCESS") => Status::Success,
        _ => Status::Failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_drops_malformed_pairs() {
        let fields = decode("A=1&B=2&garbage&C=3=4");
        assert_eq!(fields, map(&[("A", "1"), ("B", "2")]));
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_decode_trailing_separator() {
        let fields = decode("API.STATUS=SUCCESS&STREAM.HOST=10.0.0.5&");
        assert_eq!(
            fields,
            map(&[("API.STATUS", "SUCCESS"), ("STREAM.HOST", "10.0.0.5")])
        );
    }

    #[test]
    fn test_decode_last_duplicate_wins() {
        let fields = decode("A=1&A=2");
        assert_eq!(fields, map(&[("A", "2")]));
    }

    #[test]
    fn test_decode_keeps_empty_value() {
        let fields = decode("IP.ADDRESS=&UNIT.MODEL=VS-2000");
        assert_eq!(fields, map(&[("IP.ADDRESS", ""), ("UNIT.MODEL", "VS-2000")]));
    }

    #[test]
    fn test_decode_query_response() {
        let body = "CMD=START&UNIT.ID=ALL&VIDEO.TIMING=1920x1080p60&API.STATUS=SUCCESS&CMD=END";
        let fields = decode(body);
        assert_eq!(fields.get("VIDEO.TIMING").map(String::as_str), Some("1920x1080p60"));
        assert_eq!(fields.get("CMD").map(String::as_str), Some("END"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&map(&[("API.STATUS", "SUCCESS")])), Status::Success);
        assert_eq!(
            classify(&map(&[("API.STATUS", "FAILURE: busy")])),
            Status::Failure
        );
        assert_eq!(classify(&HashMap::new()), Status::Failure);
    }

    #[test]
    fn test_classify_substring_match() {
        assert!(classify(&map(&[("API.STATUS", "[SUCCESS] done")])).is_success());
        assert!(!classify(&map(&[("API.STATUS", "success")])).is_success());
    }
}
