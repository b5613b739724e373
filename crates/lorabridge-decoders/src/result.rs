//! Decode result model.

use lorabridge_commands::CloudToDeviceRequest;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::payload::RawPayload;

/// Decoded value.
///
/// Serialized untagged: numbers stay unquoted and keep their kind, so
/// `10` reads back as [`DecodedValue::Integer`] and `10.5` as
/// [`DecodedValue::Float`]. Integers beyond `i64` read back as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DecodedValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodedValue::Integer(v) => Some(*v as f64),
            DecodedValue::Float(v) => Some(*v),
            DecodedValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for DecodedValue {
    fn from(value: i64) -> Self {
        DecodedValue::Integer(value)
    }
}

/// Non-finite floats have no JSON number form and become text (`NaN`,
/// `inf`, `-inf`).
impl From<f64> for DecodedValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            DecodedValue::Float(value)
        } else {
            DecodedValue::Text(value.to_string())
        }
    }
}

impl From<String> for DecodedValue {
    fn from(value: String) -> Self {
        DecodedValue::Text(value)
    }
}

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        DecodedValue::Text(value.to_string())
    }
}

/// Outcome of decoding one uplink payload.
///
/// A result holds either a value or an error, never both. The raw payload
/// travels with failures so the original bytes survive a broken decoder;
/// decoder services may also return it on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DecodeResultFields")]
pub struct DecodeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<DecodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cloud_to_device_message: Option<CloudToDeviceRequest>,
}

/// Unchecked field set read from the wire.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecodeResultFields {
    #[serde(default)]
    value: Option<DecodedValue>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_detail: Option<String>,
    #[serde(default)]
    raw_payload: Option<String>,
    #[serde(default)]
    cloud_to_device_message: Option<CloudToDeviceRequest>,
}

impl TryFrom<DecodeResultFields> for DecodeResult {
    type Error = DecodeError;

    fn try_from(fields: DecodeResultFields) -> Result<Self, Self::Error> {
        if fields.value.is_some() && fields.error.is_some() {
            return Err(DecodeError::ConflictingResult);
        }
        Ok(Self {
            value: fields.value,
            error: fields.error,
            error_detail: fields.error_detail,
            raw_payload: fields.raw_payload,
            cloud_to_device_message: fields.cloud_to_device_message,
        })
    }
}

impl DecodeResult {
    /// Successful result holding `value`.
    pub fn success(value: impl Into<DecodedValue>) -> Self {
        let value = match value.into() {
            DecodedValue::Float(v) => DecodedValue::from(v),
            other => other,
        };
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Failed result; `raw_payload` is the base64 form of the input.
    pub fn failure(error: impl Into<String>, raw_payload: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            raw_payload: Some(raw_payload.into()),
            ..Default::default()
        }
    }

    /// Failed result with supporting detail.
    pub fn failure_with_detail(
        error: impl Into<String>,
        detail: impl Into<String>,
        raw_payload: impl Into<String>,
    ) -> Self {
        Self {
            error_detail: Some(detail.into()),
            ..Self::failure(error, raw_payload)
        }
    }

    /// Failed result for `err`, preserving `payload`.
    pub fn from_error(err: &DecodeError, payload: &[u8]) -> Self {
        let raw = RawPayload::from_bytes(payload);
        match err.detail() {
            Some(detail) => Self::failure_with_detail(err.to_string(), detail, raw),
            None => Self::failure(err.to_string(), raw),
        }
    }

    pub fn with_raw_payload(mut self, raw_payload: impl Into<String>) -> Self {
        self.raw_payload = Some(raw_payload.into());
        self
    }

    pub fn with_cloud_to_device_message(mut self, message: CloudToDeviceRequest) -> Self {
        self.cloud_to_device_message = Some(message);
        self
    }

    pub fn value(&self) -> Option<&DecodedValue> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Base64 text of the original payload, when present.
    pub fn raw_payload(&self) -> Option<&str> {
        self.raw_payload.as_deref()
    }

    /// Downlink a decoder service asked to send in response.
    pub fn cloud_to_device_message(&self) -> Option<&CloudToDeviceRequest> {
        self.cloud_to_device_message.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<DecodedValue> for DecodeResult {
    fn from(value: DecodedValue) -> Self {
        Self::success(value)
    }
}
