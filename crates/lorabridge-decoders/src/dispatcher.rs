//! Decoder dispatch.

use async_trait::async_trait;
use lorabridge_core::DecoderConfig;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::DecodeError;
use crate::payload::TelemetryPayload;
use crate::registry::DecoderRegistry;
use crate::remote::{build_url, is_remote_address, RemoteDecoderClient};
use crate::result::DecodeResult;

/// Turns an uplink payload into a decode result.
#[async_trait]
pub trait PayloadDecoder: Send + Sync {
    /// Decode `payload` with the decoder named by `decoder`.
    ///
    /// Always yields a result; failures are reported inside it.
    async fn decode_message(
        &self,
        dev_eui: &str,
        payload: &[u8],
        fport: u8,
        decoder: Option<&str>,
    ) -> DecodeResult;

    /// Telemetry for an uplink: the raw payload when the device has no
    /// decoder configured, the decode result otherwise.
    async fn telemetry_payload(
        &self,
        dev_eui: &str,
        payload: &[u8],
        fport: u8,
        decoder: Option<&str>,
    ) -> TelemetryPayload {
        match decoder {
            Some(name) if !name.is_empty() => self
                .decode_message(dev_eui, payload, fport, Some(name))
                .await
                .into(),
            _ => TelemetryPayload::raw(payload),
        }
    }
}

/// Routes a decoder name to a built-in decoder or a decoder service.
#[derive(Debug)]
pub struct DecoderDispatcher {
    registry: Arc<DecoderRegistry>,
    remote: RemoteDecoderClient,
}

impl DecoderDispatcher {
    /// Dispatcher over the built-in decoders.
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_registry(DecoderRegistry::builtin(), config)
    }

    pub fn with_registry(registry: Arc<DecoderRegistry>, config: DecoderConfig) -> Self {
        Self {
            registry,
            remote: RemoteDecoderClient::new(config),
        }
    }

    /// Dispatcher configured from the environment.
    pub fn from_env() -> lorabridge_core::Result<Self> {
        Ok(Self::new(DecoderConfig::from_env()?))
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    fn decode_local(&self, dev_eui: &str, payload: &[u8], fport: u8, name: &str) -> DecodeResult {
        match self.registry.get(name) {
            Some(decoder) => {
                debug!(dev_eui = %dev_eui, decoder = %name, "Decoding with built-in decoder");
                decoder(dev_eui, payload, fport)
            }
            None => {
                let err = DecodeError::DecoderNotFound(name.to_string());
                warn!(dev_eui = %dev_eui, decoder = %name, "{}", err);
                DecodeResult::from_error(&err, payload)
            }
        }
    }

    async fn decode_remote(
        &self,
        dev_eui: &str,
        payload: &[u8],
        fport: u8,
        address: &str,
    ) -> DecodeResult {
        let url = build_url(address, dev_eui, fport, payload);
        debug!(dev_eui = %dev_eui, url = %url, "Calling decoder service");

        match self.remote.call(&url).await {
            Ok(result) => result,
            Err(err) => {
                match &err {
                    DecodeError::RemoteDecoderRejected { status, body, .. } => {
                        warn!(dev_eui = %dev_eui, url = %url, status, body = %body, "{}", err);
                    }
                    _ => {
                        error!(
                            dev_eui = %dev_eui,
                            url = %url,
                            reason = err.detail().unwrap_or_default(),
                            "Error in decoder handling"
                        );
                    }
                }
                DecodeResult::from_error(&err, payload)
            }
        }
    }
}

impl Default for DecoderDispatcher {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

#[async_trait]
impl PayloadDecoder for DecoderDispatcher {
    async fn decode_message(
        &self,
        dev_eui: &str,
        payload: &[u8],
        fport: u8,
        decoder: Option<&str>,
    ) -> DecodeResult {
        let name = decoder.unwrap_or_default();

        if is_remote_address(name) {
            self.decode_remote(dev_eui, payload, fport, name).await
        } else {
            self.decode_local(dev_eui, payload, fport, name)
        }
    }
}
