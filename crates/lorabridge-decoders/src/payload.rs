//! Telemetry payload forms.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::result::DecodeResult;

/// Base64 text of an undecoded payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPayload(String);

impl RawPayload {
    pub fn from_bytes(payload: &[u8]) -> Self {
        Self(STANDARD.encode(payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Original bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.0)
    }
}

impl fmt::Display for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RawPayload> for String {
    fn from(payload: RawPayload) -> Self {
        payload.0
    }
}

/// Data section of an upstream telemetry message: the decoder output, or
/// the raw payload when the device has no decoder configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryPayload {
    Decoded(DecodeResult),
    Raw(RawPayload),
}

impl TelemetryPayload {
    pub fn raw(payload: &[u8]) -> Self {
        TelemetryPayload::Raw(RawPayload::from_bytes(payload))
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, TelemetryPayload::Decoded(_))
    }
}

impl From<DecodeResult> for TelemetryPayload {
    fn from(result: DecodeResult) -> Self {
        TelemetryPayload::Decoded(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_payload() {
        let raw = RawPayload::from_bytes(&[0x00, 0xFF]);
        assert_eq!(raw.as_str(), "AP8=");
        assert_eq!(raw.to_string(), "AP8=");
        assert_eq!(raw.to_bytes().unwrap(), vec![0x00, 0xFF]);
        assert_eq!(String::from(raw), "AP8=");
    }

    #[test]
    fn test_telemetry_serialization() {
        let raw = TelemetryPayload::raw(b"12");
        assert!(!raw.is_decoded());
        assert_eq!(serde_json::to_string(&raw).unwrap(), r#""MTI=""#);

        let decoded = TelemetryPayload::from(DecodeResult::success(12i64));
        assert_eq!(serde_json::to_string(&decoded).unwrap(), r#"{"value":12}"#);
    }
}
