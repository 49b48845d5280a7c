//! Wire records as produced by the ingestion pipeline.
//!
//! Every field is optional on the wire. Records are validated once, here,
//! and converted into [`WifiMessage`]; anything incomplete is rejected with a
//! [`RecordError`] instead of reaching the analyzers.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use twinwatch_types::{WifiData, WifiMessage, WifiMode};

/// Reasons a wire record is rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not valid JSON for a record.
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The line is not valid UTF-8.
    #[error("Record is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// No device identifier.
    #[error("Record has no mac")]
    MissingMac,

    /// No timestamp.
    #[error("Record from {mac} has no timestamp")]
    MissingTimestamp { mac: String },

    /// Epoch milliseconds outside the representable range.
    #[error("Record from {mac} has out of range timestamp: {millis}")]
    TimestampOutOfRange { mac: String, millis: i64 },

    /// No wifi data block.
    #[error("Record from {mac} has no wifiData")]
    MissingWifiData { mac: String },

    /// No radio mode.
    #[error("Record from {mac} has no wifi mode")]
    MissingMode { mac: String },

    /// No address list.
    #[error("Record from {mac} has no address list")]
    MissingAddressList { mac: String },
}

/// Timestamp as RFC 3339 text or epoch milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Rfc3339(DateTime<Utc>),
    EpochMillis(i64),
}

/// Unvalidated wifi block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWifiData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<WifiMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_list: Option<Vec<String>>,
}

/// Unvalidated device report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWifiMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<RawTimestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_data: Option<RawWifiData>,
}

impl RawWifiMessage {
    /// Parse and validate one raw line read from a log.
    pub fn parse_bytes(line: &[u8]) -> Result<WifiMessage, RecordError> {
        Self::parse_line(std::str::from_utf8(line)?)
    }

    /// Parse and validate one JSON record.
    pub fn parse_line(line: &str) -> Result<WifiMessage, RecordError> {
        let raw: RawWifiMessage = serde_json::from_str(line)?;
        WifiMessage::try_from(raw)
    }
}

impl From<&WifiMessage> for RawWifiMessage {
    fn from(message: &WifiMessage) -> Self {
        Self {
            mac: Some(message.mac.clone()),
            timestamp: Some(RawTimestamp::Rfc3339(message.timestamp)),
            wifi_data: Some(RawWifiData {
                mode: Some(message.wifi_data.mode),
                address_list: Some(message.wifi_data.address_list.clone()),
            }),
        }
    }
}

impl TryFrom<RawWifiMessage> for WifiMessage {
    type Error = RecordError;

    fn try_from(raw: RawWifiMessage) -> Result<Self, Self::Error> {
        let mac = match raw.mac {
            Some(mac) if !mac.trim().is_empty() => mac,
            _ => return Err(RecordError::MissingMac),
        };

        let timestamp = match raw.timestamp {
            Some(RawTimestamp::Rfc3339(ts)) => ts,
            Some(RawTimestamp::EpochMillis(millis)) => match Utc.timestamp_millis_opt(millis) {
                chrono::LocalResult::Single(ts) => ts,
                _ => return Err(RecordError::TimestampOutOfRange { mac, millis }),
            },
            None => return Err(RecordError::MissingTimestamp { mac }),
        };

        let Some(wifi) = raw.wifi_data else {
            return Err(RecordError::MissingWifiData { mac });
        };
        let Some(mode) = wifi.mode else {
            return Err(RecordError::MissingMode { mac });
        };
        let Some(address_list) = wifi.address_list else {
            return Err(RecordError::MissingAddressList { mac });
        };

        Ok(WifiMessage::new(mac, timestamp, WifiData { mode, address_list }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_record() {
        let msg = RawWifiMessage::parse_line(
            r#"{"mac":"n1","timestamp":"2024-03-01T12:00:00Z","wifiData":{"mode":"AP_STA","addressList":["n2","n3"]}}"#,
        )
        .unwrap();

        assert_eq!(msg.mac, "n1");
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        assert_eq!(msg.wifi_data.mode, WifiMode::ApSta);
        assert_eq!(msg.wifi_data.address_list, vec!["n2", "n3"]);
    }

    #[test]
    fn parses_epoch_millis_record() {
        let msg = RawWifiMessage::parse_line(
            r#"{"mac":"n1","timestamp":1700000000123,"wifiData":{"mode":"STA","addressList":[]}}"#,
        )
        .unwrap();

        assert_eq!(msg.timestamp.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(msg.wifi_data.mode, WifiMode::Sta);
    }

    #[test]
    fn rejects_missing_timestamp() {
        let err = RawWifiMessage::parse_line(
            r#"{"mac":"n1","wifiData":{"mode":"STA","addressList":[]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::MissingTimestamp { ref mac } if mac == "n1"));
    }

    #[test]
    fn rejects_missing_address_list() {
        let err = RawWifiMessage::parse_line(
            r#"{"mac":"n1","timestamp":0,"wifiData":{"mode":"AP_STA"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::MissingAddressList { .. }));
        assert_eq!(err.to_string(), "Record from n1 has no address list");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = RawWifiMessage::parse_bytes(b"\xff\xfe garbage").unwrap_err();
        assert!(matches!(err, RecordError::InvalidUtf8(_)));

        let msg = RawWifiMessage::parse_bytes(
            br#"{"mac":"n1","timestamp":0,"wifiData":{"mode":"STA","addressList":[]}}"#,
        )
        .unwrap();
        assert_eq!(msg.mac, "n1");
    }

    #[test]
    fn rejects_blank_mac() {
        let err = RawWifiMessage::parse_line(
            r#"{"mac":"  ","timestamp":0,"wifiData":{"mode":"STA","addressList":[]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::MissingMac));
    }

    #[test]
    fn rejects_missing_wifi_data_and_mode() {
        let err = RawWifiMessage::parse_line(r#"{"mac":"n1","timestamp":0}"#).unwrap_err();
        assert!(matches!(err, RecordError::MissingWifiData { .. }));

        let err = RawWifiMessage::parse_line(
            r#"{"mac":"n1","timestamp":0,"wifiData":{"addressList":[]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::MissingMode { .. }));
    }

    #[test]
    fn rejects_out_of_range_millis() {
        let err = RawWifiMessage::parse_line(&format!(
            r#"{{"mac":"n1","timestamp":{},"wifiData":{{"mode":"STA","addressList":[]}}}}"#,
            i64::MAX
        ))
        .unwrap_err();
        assert!(matches!(err, RecordError::TimestampOutOfRange { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = RawWifiMessage::parse_line("not json").unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn converts_back_to_wire_shape() {
        let msg = WifiMessage::builder("n1", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .mode(WifiMode::ApSta)
            .address("n2")
            .build();

        let json = serde_json::to_string(&RawWifiMessage::from(&msg)).unwrap();
        assert_eq!(RawWifiMessage::parse_line(&json).unwrap(), msg);
    }
}
