//! HTTP client for decoder services.

use lorabridge_core::DecoderConfig;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION};
use reqwest::Client;
use tracing::debug;

use crate::error::DecodeError;
use crate::payload::RawPayload;
use crate::result::DecodeResult;

/// Whether `decoder` names a decoder service rather than a built-in.
pub fn is_remote_address(decoder: &str) -> bool {
    let prefix_matches = |prefix: &str| {
        decoder
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    prefix_matches("http://") || prefix_matches("https://")
}

/// Request URL for a decoder service call.
pub fn build_url(address: &str, dev_eui: &str, fport: u8, payload: &[u8]) -> String {
    let address = address.strip_suffix('/').unwrap_or(address);
    let separator = if address.contains('?') { '&' } else { '?' };
    let payload = RawPayload::from_bytes(payload);

    format!(
        "{}{}devEUI={}&fport={}&payload={}",
        address,
        separator,
        urlencoding::encode(dev_eui),
        fport,
        urlencoding::encode(payload.as_str())
    )
}

/// Calls decoder services over a connection pool shared by every call.
///
/// The underlying client is created on first use.
#[derive(Debug)]
pub struct RemoteDecoderClient {
    config: DecoderConfig,
    client: OnceCell<Client>,
}

impl RemoteDecoderClient {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn client(&self) -> Result<&Client, String> {
        self.client.get_or_try_init(|| {
            let mut headers = HeaderMap::new();
            headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
            let keep_alive =
                HeaderValue::from_str(&format!("timeout={}", self.config.keep_alive_secs))
                    .map_err(|e| e.to_string())?;
            headers.insert(HeaderName::from_static("keep-alive"), keep_alive);

            debug!(
                timeout_ms = self.config.request_timeout_ms,
                keep_alive_secs = self.config.keep_alive_secs,
                "Creating decoder service client"
            );

            Client::builder()
                .default_headers(headers)
                .timeout(self.config.request_timeout())
                .pool_idle_timeout(self.config.keep_alive())
                .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
                .build()
                .map_err(|e| e.to_string())
        })
    }

    /// GET `url` and read the body as a decode result.
    ///
    /// A success body is returned as the service sent it, including any
    /// error it reports.
    pub async fn call(&self, url: &str) -> Result<DecodeResult, DecodeError> {
        let client = self
            .client()
            .map_err(|reason| DecodeError::unreachable(url, reason))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| DecodeError::unreachable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DecodeError::RemoteDecoderRejected {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DecodeError::unreachable(url, e))?;

        DecodeResult::from_json(&body).map_err(|e| DecodeError::unreachable(url, e))
    }
}

impl Default for RemoteDecoderClient {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
