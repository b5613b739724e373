//! Cloud-to-device messages.
//!
//! A cloud-to-device message is a pending downlink, independent of the
//! channel it arrived on. The transmission scheduler consumes each message
//! once and reports back through exactly one of
//! [`CloudToDeviceMessage::complete`] or [`CloudToDeviceMessage::abandon`].
//! Both report whether the signal itself was accepted; neither says
//! anything about what the device actually received.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::DownlinkError;
use crate::holder::MacCommandHolder;

/// Pending downlink as seen by the transmission scheduler.
#[async_trait]
pub trait CloudToDeviceMessage: Send + Sync {
    fn dev_eui(&self) -> &str;

    fn fport(&self) -> u8;

    fn body(&self) -> &[u8];

    /// Whether the device must acknowledge the frame.
    fn confirmed(&self) -> bool;

    /// Correlation id.
    fn message_id(&self) -> &str;

    /// MAC commands to merge into the outbound frame, if any.
    fn mac_commands(&self) -> Option<&MacCommandHolder>;

    /// Signal successful delivery.
    async fn complete(&self) -> bool;

    /// Signal that delivery should be retried later.
    async fn abandon(&self) -> bool;
}

/// Message received through a direct invocation rather than a queue.
///
/// Nothing upstream waits for the outcome, so both signals are always
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectCloudToDeviceMessage {
    dev_eui: String,
    fport: u8,
    body: Vec<u8>,
    confirmed: bool,
    message_id: String,
    mac_commands: Option<MacCommandHolder>,
}

impl DirectCloudToDeviceMessage {
    pub fn new(dev_eui: impl Into<String>, fport: u8, body: Vec<u8>) -> Self {
        Self {
            dev_eui: dev_eui.into(),
            fport,
            body,
            confirmed: false,
            message_id: uuid::Uuid::new_v4().to_string(),
            mac_commands: None,
        }
    }

    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn with_mac_commands(mut self, mac_commands: MacCommandHolder) -> Self {
        self.mac_commands = Some(mac_commands);
        self
    }

    /// Body as base64 text.
    pub fn body_base64(&self) -> String {
        STANDARD.encode(&self.body)
    }
}

#[async_trait]
impl CloudToDeviceMessage for DirectCloudToDeviceMessage {
    fn dev_eui(&self) -> &str {
        &self.dev_eui
    }

    fn fport(&self) -> u8 {
        self.fport
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn confirmed(&self) -> bool {
        self.confirmed
    }

    fn message_id(&self) -> &str {
        &self.message_id
    }

    fn mac_commands(&self) -> Option<&MacCommandHolder> {
        self.mac_commands.as_ref()
    }

    async fn complete(&self) -> bool {
        true
    }

    async fn abandon(&self) -> bool {
        true
    }
}

/// Wire form of a downlink request.
///
/// The body is given either as UTF-8 text (`payload`) or as base64
/// (`rawPayload`), never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudToDeviceRequest {
    #[serde(rename = "devEUI")]
    pub dev_eui: String,
    pub fport: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl CloudToDeviceRequest {
    pub fn from_json(json: &str) -> Result<Self, DownlinkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decoded body bytes.
    pub fn body(&self) -> Result<Vec<u8>, DownlinkError> {
        match (&self.payload, &self.raw_payload) {
            (Some(_), Some(_)) => Err(DownlinkError::InvalidRequest(
                "payload and rawPayload are mutually exclusive".to_string(),
            )),
            (Some(text), None) => Ok(text.as_bytes().to_vec()),
            (None, Some(raw)) => STANDARD
                .decode(raw.trim())
                .map_err(|e| DownlinkError::InvalidPayload(e.to_string())),
            (None, None) => Ok(Vec::new()),
        }
    }

    /// Validate and turn into a message; a missing `messageId` gets a
    /// fresh UUID.
    pub fn into_message(self) -> Result<DirectCloudToDeviceMessage, DownlinkError> {
        if self.dev_eui.trim().is_empty() {
            return Err(DownlinkError::InvalidRequest("devEUI is required".to_string()));
        }
        let body = self.body()?;
        if self.fport == 0 && !body.is_empty() {
            return Err(DownlinkError::InvalidRequest(
                "fport 0 is reserved for MAC commands".to_string(),
            ));
        }

        let mut message = DirectCloudToDeviceMessage::new(self.dev_eui, self.fport, body)
            .with_confirmed(self.confirmed);
        if let Some(id) = self.message_id.filter(|id| !id.is_empty()) {
            message = message.with_message_id(id);
        }
        Ok(message)
    }
}
