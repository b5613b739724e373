//! Built-in decoder dispatch tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lorabridge_decoders::{
    DecodeResult, DecodedValue, DecoderDispatcher, DecoderRegistry, PayloadDecoder,
    TelemetryPayload,
};
use std::sync::Arc;

const DEV_EUI: &str = "12";

#[tokio::test]
async fn test_value_sensor_integer() {
    let dispatcher = DecoderDispatcher::default();
    let result = dispatcher
        .decode_message(DEV_EUI, b"1234", 1, Some("DecoderValueSensor"))
        .await;

    assert!(result.is_success());
    assert_eq!(result.value(), Some(&DecodedValue::Integer(1234)));
    assert_eq!(result.to_json().unwrap(), r#"{"value":1234}"#);
}

#[tokio::test]
async fn test_value_sensor_float_ignores_case() {
    let dispatcher = DecoderDispatcher::default();
    let result = dispatcher
        .decode_message(DEV_EUI, b"12.34", 1, Some("DECODERVALUESENSOR"))
        .await;

    assert_eq!(result.value(), Some(&DecodedValue::Float(12.34)));
}

#[tokio::test]
async fn test_value_sensor_text() {
    let dispatcher = DecoderDispatcher::default();
    let result = dispatcher
        .decode_message(DEV_EUI, b"hello world", 2, Some("decodervaluesensor"))
        .await;

    assert_eq!(result.value(), Some(&DecodedValue::Text("hello world".to_string())));
    assert_eq!(result.to_json().unwrap(), r#"{"value":"hello world"}"#);
}

#[tokio::test]
async fn test_unknown_decoder_keeps_payload() {
    let dispatcher = DecoderDispatcher::default();
    let payload = [0x01, 0x02, 0xFF];
    let expected_raw = STANDARD.encode(payload);

    for decoder in [Some("Does not exist"), Some(""), None] {
        let result = dispatcher.decode_message(DEV_EUI, &payload, 8, decoder).await;

        assert!(!result.is_success(), "{:?}", decoder);
        assert!(result.value().is_none());
        assert!(!result.error().unwrap().is_empty());
        assert_eq!(result.raw_payload(), Some(expected_raw.as_str()));
    }

    let result = dispatcher
        .decode_message(DEV_EUI, &payload, 8, Some("Does not exist"))
        .await;
    assert_eq!(result.error(), Some("No 'Does not exist' decoder found"));
}

#[tokio::test]
async fn test_null_and_empty_decoder_match() {
    let dispatcher = DecoderDispatcher::default();
    let none = dispatcher.decode_message(DEV_EUI, b"1", 1, None).await;
    let empty = dispatcher.decode_message(DEV_EUI, b"1", 1, Some("")).await;
    assert_eq!(none, empty);
}

fn reverse(_dev_eui: &str, payload: &[u8], _fport: u8) -> DecodeResult {
    let text: String = String::from_utf8_lossy(payload).chars().rev().collect();
    DecodeResult::success(text)
}

fn port_echo(_dev_eui: &str, _payload: &[u8], fport: u8) -> DecodeResult {
    DecodeResult::success(i64::from(fport))
}

#[tokio::test]
async fn test_custom_registry() {
    let registry = DecoderRegistry::builder()
        .register("Reverse", reverse)
        .register("PortEcho", port_echo)
        .build();
    let dispatcher = DecoderDispatcher::with_registry(Arc::new(registry), Default::default());

    let result = dispatcher.decode_message(DEV_EUI, b"abc", 1, Some("reverse")).await;
    assert_eq!(result.value().and_then(|v| v.as_str()), Some("cba"));

    let result = dispatcher.decode_message(DEV_EUI, b"", 42, Some("PORTECHO")).await;
    assert_eq!(result.value().and_then(|v| v.as_i64()), Some(42));

    // built-ins were not registered
    let result = dispatcher
        .decode_message(DEV_EUI, b"1", 1, Some("DecoderValueSensor"))
        .await;
    assert!(!result.is_success());
    assert_eq!(dispatcher.registry().names(), vec!["PortEcho", "Reverse"]);
}

#[tokio::test]
async fn test_telemetry_payload() {
    let dispatcher = DecoderDispatcher::default();

    let raw = dispatcher.telemetry_payload(DEV_EUI, b"21", 1, None).await;
    assert_eq!(raw, TelemetryPayload::raw(b"21"));

    let raw = dispatcher.telemetry_payload(DEV_EUI, b"21", 1, Some("")).await;
    assert!(!raw.is_decoded());

    let decoded = dispatcher
        .telemetry_payload(DEV_EUI, b"21", 1, Some("DecoderValueSensor"))
        .await;
    assert_eq!(serde_json::to_string(&decoded).unwrap(), r#"{"value":21}"#);
}

#[tokio::test]
async fn test_dispatcher_behind_trait_object() {
    let decoder: Arc<dyn PayloadDecoder> = Arc::new(DecoderDispatcher::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let decoder = Arc::clone(&decoder);
            tokio::spawn(async move {
                let payload = i.to_string();
                decoder
                    .decode_message(DEV_EUI, payload.as_bytes(), 1, Some("DecoderValueSensor"))
                    .await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        assert_eq!(result.value(), Some(&DecodedValue::Integer(i as i64)));
    }
}
